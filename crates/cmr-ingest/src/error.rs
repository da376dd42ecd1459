//! Error types for CMR ingest.

use std::path::PathBuf;

use thiserror::Error;

pub type IngestResult<T> = Result<T, IngestError>;

#[derive(Error, Debug)]
pub enum IngestError {
    /// No Launchpad token file could be found
    #[error("A launchpad token is not available: {0}")]
    TokenUnavailable(String),

    /// The token file exists but holds no usable token
    #[error("Invalid token file {path}: {reason}")]
    InvalidToken { path: PathBuf, reason: String },

    /// The target collection's ShortName could not be determined
    #[error("Failed to obtain collection ShortName for concept-id '{concept_id}': {reason}")]
    CollectionLookup { concept_id: String, reason: String },

    #[error("Invalid ingest configuration: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    pub fn collection_lookup(concept_id: impl Into<String>, reason: impl ToString) -> Self {
        Self::CollectionLookup {
            concept_id: concept_id.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_token(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::InvalidToken {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
