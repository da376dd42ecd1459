//! Error types for granule reading operations.

use thiserror::Error;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for granule reading.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Granule file does not exist or is not a regular file
    #[error("Granule not found: {0}")]
    NotFound(String),

    /// CDL header could not be parsed
    #[error("CDL syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Command execution error (ncdump)
    #[error("Command execution failed: {0}")]
    CommandError(String),
}

impl NetCdfError {
    pub fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
