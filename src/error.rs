/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Remote operation `{operation}` failed with status {status}: {detail}")]
    RemoteOperationFailed {
        operation: &'static str,
        status: u16,
        detail: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// True when the failure came from talking to the backend
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            AppError::HttpClient(_) | AppError::RemoteOperationFailed { .. }
        )
    }

    /// Short description suitable for a user-facing notice
    pub fn user_detail(&self) -> String {
        match self {
            AppError::RemoteOperationFailed { detail, .. } => detail.clone(),
            AppError::NotFound(msg) | AppError::InvalidInput(msg) | AppError::Internal(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
