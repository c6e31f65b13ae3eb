use tokio::sync::mpsc;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A transient, dismissible message for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            detail: None,
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Fire-and-forget sink for notices
///
/// Notices are always logged. When a receiver is attached they are also
/// queued on an unbounded channel; a dropped receiver is ignored.
#[derive(Clone, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notice>>,
}

impl Notifier {
    /// Notifier that only logs
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Notifier paired with the receiver a presentation layer drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    pub fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(title = %notice.title, "Notice"),
            NoticeLevel::Error => tracing::warn!(
                title = %notice.title,
                detail = notice.detail.as_deref().unwrap_or_default(),
                "Error notice"
            ),
        }

        if let Some(tx) = &self.tx {
            let _ = tx.send(notice);
        }
    }
}
