//! In-process store for development and tests.
//!
//! Identities are assigned sequentially from 1, like a `BIGSERIAL` column.

use std::collections::BTreeMap;

use async_trait::async_trait;
use bookshelf_core::{Book, BookId, DataStore, NewBook, PageRequest, PageResult, SortDirection};
use tokio::sync::RwLock;

use crate::error::StoreError;

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    books: BTreeMap<BookId, Book>,
}

/// A [`DataStore`] that keeps books in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored books.
    pub async fn len(&self) -> usize {
        self.inner.read().await.books.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl DataStore for MemoryStore {
    async fn create_book(&self, book: NewBook) -> bookshelf_core::Result<Book> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let book = book.with_id(BookId(inner.last_id));
        inner.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> bookshelf_core::Result<()> {
        let mut inner = self.inner.write().await;
        match inner.books.get_mut(&book.id) {
            Some(stored) => {
                stored.clone_from(book);
                Ok(())
            }
            None => Err(StoreError::BookNotFound(book.id).into()),
        }
    }

    async fn delete_book(&self, book: &Book) -> bookshelf_core::Result<()> {
        let mut inner = self.inner.write().await;
        match inner.books.remove(&book.id) {
            Some(_) => Ok(()),
            None => Err(StoreError::BookNotFound(book.id).into()),
        }
    }

    async fn get_book(&self, id: BookId) -> bookshelf_core::Result<Option<Book>> {
        Ok(self.inner.read().await.books.get(&id).cloned())
    }

    async fn get_books(
        &self,
        request: PageRequest,
    ) -> bookshelf_core::Result<(PageResult, Vec<Book>)> {
        let inner = self.inner.read().await;
        let total_rows = inner.books.len() as i64;

        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);

        let books: Vec<Book> = match request.sort() {
            SortDirection::Asc => inner.books.values().skip(skip).take(take).cloned().collect(),
            SortDirection::Desc => inner
                .books
                .values()
                .rev()
                .skip(skip)
                .take(take)
                .cloned()
                .collect(),
        };

        Ok((request.paginate(total_rows), books))
    }
}
