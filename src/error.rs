use thiserror::Error;

/// Errors that can occur while talking to the remote data store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{operation} failed for {path}: {status} {status_text}")]
    UnexpectedStatus {
        operation: &'static str,
        path: String,
        status: u16,
        status_text: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No file tracked at {path}")]
    NotInCollection { path: String },

    #[error("A file is already tracked at {path}")]
    PathTaken { path: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl StoreError {
    pub(crate) fn unexpected_status(
        operation: &'static str,
        path: &str,
        status: u16,
        status_text: &str,
    ) -> Self {
        StoreError::UnexpectedStatus {
            operation,
            path: path.to_string(),
            status,
            status_text: status_text.to_string(),
        }
    }

    /// The HTTP status carried by an unexpected-status error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
