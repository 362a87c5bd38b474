//! Store error types
//!
//! Defines all errors that can occur in the persistence layer.

use thiserror::Error;

/// Errors that can occur in the store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite rejected a statement or failed to open
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O operation failed (data directory, uploads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Requested record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated (duplicate email, category name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Connection mutex was poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl StoreError {
    /// Map a unique-constraint failure to `Conflict`, pass everything else through.
    pub(crate) fn from_insert(err: rusqlite::Error, what: &str) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(format!("{} already exists", what))
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::NotFound("complaint 7".to_string());
        assert_eq!(err.to_string(), "Not found: complaint 7");

        let err = StoreError::Conflict("student email".to_string());
        assert_eq!(err.to_string(), "Conflict: student email");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let store_err: StoreError = io_err.into();
        assert!(matches!(store_err, StoreError::Io(_)));
    }

    #[test]
    fn test_from_insert_passes_through_other_errors() {
        let err = StoreError::from_insert(rusqlite::Error::QueryReturnedNoRows, "user");
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
