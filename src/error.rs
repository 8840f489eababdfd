use thiserror::Error;

/// Failure classes surfaced by the builder controllers. Everything is caught
/// at the controller boundary and converted to a failure event; callers only
/// see these when they invoke the lower layers directly.
#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Malformed drag payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BuilderError {
    fn from(e: reqwest::Error) -> Self {
        BuilderError::Network(e.to_string())
    }
}
