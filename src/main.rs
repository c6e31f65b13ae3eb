use movie_curator::{models::CollectionName, Config, Session};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    // Initialize the session against the configured backend
    let (session, mut notices) = Session::from_config(&config);
    session.start().await?;

    let collections = session.store.collections().await;
    for name in CollectionName::ALL {
        println!("{:<15} {}", name.as_str(), collections.get(name).len());
    }

    let keywords = session.store.sorted_keywords().await;
    if !keywords.is_empty() {
        let top: Vec<&str> = keywords.iter().take(10).map(String::as_str).collect();
        println!("top keywords: {}", top.join(", "));
    }

    while let Ok(notice) = notices.try_recv() {
        tracing::debug!(?notice, "Pending notice");
    }

    Ok(())
}
