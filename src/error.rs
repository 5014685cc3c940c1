//! Error types for network construction, training and serialization
//!
//! Every fallible public operation returns [`NetworkError`]. Failures are
//! raised before any state is mutated, so a failed call leaves the network
//! exactly as it was.

use thiserror::Error;

/// Result type alias for this crate
pub type Result<T> = std::result::Result<T, NetworkError>;

/// Errors produced by the training engine.
#[derive(Error, Debug)]
pub enum NetworkError {
    /// Unknown activation/loss/initializer/optimizer name, or an out-of-range
    /// hyperparameter. The previous configuration stays active.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input or target vector length does not match the architecture.
    #[error("shape mismatch: {0}")]
    Shape(String),

    /// Imported document is malformed or inconsistent with its architecture.
    #[error("invalid model document: {0}")]
    Validation(String),

    /// Out-of-range layer/node/weight index in an edit or read operation.
    #[error("index out of range: {0}")]
    Index(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NetworkError {
    pub(crate) fn configuration(msg: impl Into<String>) -> Self {
        NetworkError::Configuration(msg.into())
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        NetworkError::Validation(msg.into())
    }

    pub(crate) fn index(msg: impl Into<String>) -> Self {
        NetworkError::Index(msg.into())
    }

    pub(crate) fn shape(msg: impl Into<String>) -> Self {
        NetworkError::Shape(msg.into())
    }

    /// `Shape` error unless `actual == expected`; `what` names the vector.
    pub(crate) fn check_len(what: &str, expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(NetworkError::Shape(format!(
                "{} has {} values, expected {}",
                what, actual, expected
            )))
        }
    }
}
