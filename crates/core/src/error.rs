use thiserror::Error;

pub type StatusPageResult<T> = Result<T, StatusPageError>;

#[derive(Error, Debug)]
pub enum StatusPageError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template rendering error: {0}")]
    Template(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
