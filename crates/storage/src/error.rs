//! Error types for store operations.

use std::fmt;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur reading or writing the document store.
///
/// A failed write never corrupts the stored document: each write is a
/// single whole-document replace that either lands or leaves the prior
/// value intact.
#[derive(Debug)]
pub enum StorageError {
    /// Underlying database failure.
    Sqlite(rusqlite::Error),
    /// A document could not be serialized for writing.
    Encode(serde_json::Error),
    /// A stored document could not be deserialized.
    Decode {
        key: &'static str,
        source: serde_json::Error,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Sqlite(e) => write!(f, "database error: {e}"),
            StorageError::Encode(e) => write!(f, "failed to encode document: {e}"),
            StorageError::Decode { key, source } => {
                write!(f, "failed to decode document '{key}': {source}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Sqlite(e) => Some(e),
            StorageError::Encode(e) => Some(e),
            StorageError::Decode { source, .. } => Some(source),
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Sqlite(e)
    }
}
