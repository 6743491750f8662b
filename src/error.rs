use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankerError {
    #[error("Invalid session configuration: {0}")]
    Configuration(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid process index {index}: session has {count} processes")]
    InvalidProcess { index: usize, count: usize },

    #[error("Invalid resource vector: expected {expected} components, got {got}")]
    InvalidResourceVector { expected: usize, got: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BankerError>;
