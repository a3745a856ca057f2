//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for sqlx queries.
//! They are kept separate from the domain types in bookshelf-core.

use bookshelf_core::{Book, BookId};
use sqlx::FromRow;

/// Database row for the `books` table.
#[derive(Debug, Clone, FromRow)]
pub struct BookRow {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub description: String,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Self {
            id: BookId(row.id),
            title: row.title,
            author: row.author,
            description: row.description,
        }
    }
}
