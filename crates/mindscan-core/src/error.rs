use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during mindscan core operations.
#[derive(Debug, Error)]
pub enum MindscanError {
    /// The persisted model is missing, unreadable, or does not describe a
    /// concern recognizer.
    #[error("failed to load model from {path:?}: {reason}")]
    ModelLoad {
        /// Location the model was requested from.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The trained model could not be written.
    #[error("failed to save model to {path:?}: {reason}")]
    ModelSave {
        /// Destination of the model artifact.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// A category table failed validation.
    #[error("invalid category table: {0}")]
    InvalidTable(String),

    /// A regex pattern failed to compile (should not happen with static patterns).
    #[error("regex compilation error: {0}")]
    RegexError(#[from] regex::Error),

    /// Sequence decoding received inconsistent score dimensions.
    #[error("decode error: {0}")]
    Decode(String),

    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MindscanError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn model_save(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ModelSave {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for mindscan operations.
pub type Result<T> = std::result::Result<T, MindscanError>;
