use thiserror::Error;

/// Errors from the core crate (config, validation).
#[derive(Debug, Error)]
pub enum SpectraError {
    #[error("config error: {0}")]
    Config(String),

    #[error("invalid build criteria: {0}")]
    Criteria(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
