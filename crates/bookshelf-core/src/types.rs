//! Book records and the request/response bodies of the HTTP API.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RULE_REQUIRED, ValidationErrors};
use crate::pagination::PageResult;

// ============================================================================
// ID Types
// ============================================================================

/// Store-assigned identity of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub i64);

impl BookId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

impl From<i64> for BookId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

// ============================================================================
// Book
// ============================================================================

/// A persisted book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub description: String,
}

/// A book that has not been assigned an identity yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub description: String,
}

impl NewBook {
    /// Attach the identity assigned by a store.
    #[must_use]
    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            description: self.description,
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /books.
///
/// Absent fields deserialize as empty strings so that validation can report
/// every missing field at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddBookRequest {
    pub title: String,
    pub author: String,
    pub description: String,
}

impl AddBookRequest {
    /// Check that every field is non-empty, collecting all failures.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for (field, value) in [
            ("title", &self.title),
            ("author", &self.author),
            ("description", &self.description),
        ] {
            if value.is_empty() {
                errors.add(field, RULE_REQUIRED);
            }
        }
        errors.into_result()
    }
}

impl From<AddBookRequest> for NewBook {
    fn from(request: AddBookRequest) -> Self {
        Self {
            title: request.title,
            author: request.author,
            description: request.description,
        }
    }
}

/// Response body for POST /books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBookResponse {
    pub id: BookId,
}

/// Request body for PUT /books/{id}.
///
/// An empty or absent field leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateBookRequest {
    pub title: String,
    pub author: String,
    pub description: String,
}

impl UpdateBookRequest {
    /// Overwrite the fields of `book` that this request sets.
    pub fn apply_to(&self, book: &mut Book) {
        if !self.title.is_empty() {
            book.title.clone_from(&self.title);
        }
        if !self.author.is_empty() {
            book.author.clone_from(&self.author);
        }
        if !self.description.is_empty() {
            book.description.clone_from(&self.description);
        }
    }
}

/// Response body for GET /books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetBooksResponse {
    pub books: Vec<Book>,
    pub pagination: PageResult,
}

/// Response body for DELETE /books/{id}. Serializes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteBookResponse {}
