use std::result::Result as StdResult;
use thiserror::Error;

/// Errors that can occur when starting test infrastructure.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// A type alias for `Result` with `TestInfraError`.
pub type Result<T> = StdResult<T, TestInfraError>;
