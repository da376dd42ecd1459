//! Error types for vocabulary loading.

use thiserror::Error;

pub type VocabularyResult<T> = Result<T, VocabularyLoadError>;

#[derive(Error, Debug)]
pub enum VocabularyLoadError {
    /// The table could not be fetched or read
    #[error("Vocabulary unreachable at {location}: {reason}")]
    Unreachable { location: String, reason: String },

    /// The document is not a CF standard-name table
    #[error("Malformed standard-name table: {0}")]
    Malformed(String),
}

impl VocabularyLoadError {
    pub fn unreachable(location: impl Into<String>, reason: impl ToString) -> Self {
        Self::Unreachable {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}
