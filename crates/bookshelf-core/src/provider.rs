//! The persistence seam consumed by the book service.

use async_trait::async_trait;

use crate::Result;
use crate::pagination::{PageRequest, PageResult};
use crate::types::{Book, BookId, NewBook};

/// CRUD and paginated listing of books.
///
/// Implementations report their own failures as untyped errors; only the
/// absence of a record is distinguished, as `Ok(None)` from [`get_book`].
///
/// [`get_book`]: DataStore::get_book
#[async_trait]
pub trait DataStore: Send + Sync {
    /// Persist a new book and return it with its assigned identity.
    async fn create_book(&self, book: NewBook) -> Result<Book>;

    /// Overwrite the stored fields of an existing book.
    async fn update_book(&self, book: &Book) -> Result<()>;

    /// Remove a book.
    async fn delete_book(&self, book: &Book) -> Result<()>;

    /// Fetch a book, or `None` if no book has this identity.
    async fn get_book(&self, id: BookId) -> Result<Option<Book>>;

    /// Fetch one page of books ordered by identity, with page metadata.
    async fn get_books(&self, request: PageRequest) -> Result<(PageResult, Vec<Book>)>;
}
