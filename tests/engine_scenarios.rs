mod common;

use std::{
    sync::{atomic::Ordering, Arc},
    time::Duration,
};

use common::{movie, related_titles, InMemoryBackend};
use tokio::sync::Semaphore;

use movie_curator::{
    models::{CollectionName, Collections, Presented},
    services::{AcceptOutcome, EngineState, Notifier},
    Session,
};

fn presented_title(session: &Session) -> String {
    session
        .engine
        .state()
        .presented()
        .map(|p| p.title().to_string())
        .expect("engine should be presenting")
}

#[tokio::test]
async fn test_arrival_top_level_accept_cycles_to_next() {
    let backend = Arc::new(InMemoryBackend::default());
    backend.queue_suggestions(&["Arrival", "Contact"]);
    let session = Session::new(backend.clone(), Notifier::disabled());
    session.start().await.unwrap();

    session.engine.request_suggestion().await.unwrap();
    assert_eq!(presented_title(&session), "Arrival");

    let outcome = session
        .engine
        .accept(CollectionName::WantToWatch, None)
        .await
        .unwrap();
    assert_eq!(outcome, AcceptOutcome::Advanced);

    let added = backend.added.lock().unwrap().clone();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].0, CollectionName::WantToWatch);
    assert_eq!(added[0].1.title, "Arrival");
    assert_eq!(added[0].1.score, None);

    assert_eq!(backend.suggest_calls.load(Ordering::SeqCst), 2);
    assert_eq!(presented_title(&session), "Contact");
    assert_eq!(
        session.store.owner_of("Arrival").await,
        Some(CollectionName::WantToWatch)
    );
}

#[tokio::test]
async fn test_arrival_related_accept_keeps_context() {
    let backend = Arc::new(InMemoryBackend {
        related_pool: vec!["Arrival".to_string()],
        ..Default::default()
    });
    backend.queue_suggestions(&["Contact"]);
    let session = Session::new(backend.clone(), Notifier::disabled());
    session.start().await.unwrap();

    session.engine.request_suggestion().await.unwrap();

    let mut browser = session.related_browser();
    browser.focus("Contact");
    let related = browser.next().await.cloned().unwrap();
    session.engine.select_related(related).await.unwrap();

    let outcome = session
        .engine
        .accept(CollectionName::Watched, Some(7))
        .await
        .unwrap();
    assert_eq!(outcome, AcceptOutcome::Promoted);

    let added = backend.added.lock().unwrap().clone();
    assert_eq!(added[0].0, CollectionName::Watched);
    assert_eq!(added[0].1.score, Some(7));
    assert_eq!(backend.suggest_calls.load(Ordering::SeqCst), 1);

    match session.engine.state() {
        EngineState::Presenting(Presented::Suggested(suggestion)) => {
            assert_eq!(suggestion.title, "Arrival");
            assert!(suggestion.is_in_list);
            assert!(suggestion.from_recommendation);
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn test_owned_suggestion_moves_and_closes() {
    let backend = Arc::new(InMemoryBackend::with_collections(Collections {
        undecided: vec![movie("Heat", "2024-02-02")],
        ..Default::default()
    }));
    backend.queue_suggestions(&["Heat"]);
    let session = Session::new(backend.clone(), Notifier::disabled());
    session.start().await.unwrap();

    session.engine.request_suggestion().await.unwrap();
    let outcome = session
        .engine
        .accept(CollectionName::Watched, Some(9))
        .await
        .unwrap();

    assert_eq!(outcome, AcceptOutcome::Moved);
    assert_eq!(session.engine.state(), EngineState::Idle);
    assert_eq!(backend.suggest_calls.load(Ordering::SeqCst), 1);

    let (collection, heat) = session.store.find("Heat").await.unwrap();
    assert_eq!(collection, CollectionName::Watched);
    assert_eq!(heat.score, Some(9));
}

#[tokio::test]
async fn test_empty_queue_errors_then_recovers() {
    let backend = Arc::new(InMemoryBackend::default());
    let session = Session::new(backend.clone(), Notifier::disabled());

    assert!(session.engine.request_suggestion().await.is_err());
    assert!(matches!(session.engine.state(), EngineState::Error(_)));

    session.engine.acknowledge().unwrap();
    backend.queue_suggestions(&["Ran"]);
    session.engine.request_suggestion().await.unwrap();
    assert_eq!(presented_title(&session), "Ran");
}

#[tokio::test]
async fn test_get_another_discards_current() {
    let backend = Arc::new(InMemoryBackend {
        related_pool: related_titles(3),
        ..Default::default()
    });
    backend.queue_suggestions(&["Alien", "Aliens"]);
    let session = Session::new(backend, Notifier::disabled());

    assert!(session.engine.get_another().await.is_err());
    session.engine.request_suggestion().await.unwrap();
    session.engine.get_another().await.unwrap();
    assert_eq!(presented_title(&session), "Aliens");
}

#[tokio::test]
async fn test_details_lookup_for_new_title() {
    let backend = Arc::new(InMemoryBackend::default());
    let session = Session::new(backend, Notifier::disabled());

    session.engine.request_details("Stalker").await.unwrap();
    match session.engine.state() {
        EngineState::Presenting(Presented::Suggested(suggestion)) => {
            assert_eq!(suggestion.title, "Stalker");
            assert!(!suggestion.is_in_list);
            assert!(!suggestion.from_recommendation);
        }
        other => panic!("unexpected state {:?}", other),
    }
}

#[tokio::test]
async fn test_response_after_close_is_still_presented() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = Arc::new(InMemoryBackend {
        suggest_gate: Some(gate.clone()),
        ..Default::default()
    });
    backend.queue_suggestions(&["Stalker"]);
    let session = Session::new(backend, Notifier::disabled());

    let engine = session.engine.clone();
    let request = tokio::spawn(async move { engine.request_suggestion().await });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(session.engine.state(), EngineState::Loading);

    session.engine.close();
    assert_eq!(session.engine.state(), EngineState::Idle);

    gate.add_permits(1);
    request.await.unwrap().unwrap();
    assert_eq!(presented_title(&session), "Stalker");
}
