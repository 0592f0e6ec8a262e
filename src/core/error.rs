use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Search deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("No legal action available for side {0:?}")]
    NoLegalActions(crate::battle::Side),

    #[error("Search cancelled")]
    Cancelled,

    #[error("Engine failure: {0}")]
    Engine(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AgentError>;
