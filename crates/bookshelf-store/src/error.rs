//! Error types for the storage layer.

use bookshelf_core::BookId;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// A write targeted a book that no longer exists.
    #[error("book not found: {0}")]
    BookNotFound(BookId),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

/// Store failures are untyped as far as the API is concerned; they surface as
/// internal errors unless something upstream classifies them.
impl From<StoreError> for bookshelf_core::Error {
    fn from(err: StoreError) -> Self {
        bookshelf_core::Error::other(err)
    }
}
