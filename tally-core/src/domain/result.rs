//! Result and error types for the core library

use thiserror::Error;

/// Structural problems with an uploaded CSV file
///
/// These abort the whole upload; the message is shown to the user as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("CSV file must contain at least a header row and one data row")]
    InsufficientRows,

    #[error("CSV file must contain at least 3 columns (found {found})")]
    TooFewColumns { found: usize },

    #[error("No valid data rows found in CSV file")]
    NoValidRows,
}

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
