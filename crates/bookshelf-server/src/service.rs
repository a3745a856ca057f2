//! Book business rules, independent of HTTP.

use std::sync::Arc;

use bookshelf_core::{
    AddBookRequest, AddBookResponse, Book, BookId, DataStore, DeleteBookResponse, Error,
    GetBooksResponse, NewBook, PageRequest, Result, UpdateBookRequest,
};

use crate::context::RequestContext;

/// Message of the `NotFound` error for an unknown book.
pub const BOOK_NOT_FOUND: &str = "book not found";

/// Operations on books backed by a [`DataStore`].
///
/// Store failures are passed through unchanged; only a missing book is
/// turned into a `NotFound` error here.
#[derive(Clone)]
pub struct BookService {
    store: Arc<dyn DataStore>,
}

impl BookService {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// Validate and persist a new book.
    pub async fn add_book(
        &self,
        ctx: &RequestContext,
        request: AddBookRequest,
    ) -> Result<AddBookResponse> {
        request.validate()?;

        let book = self.store.create_book(NewBook::from(request)).await?;
        tracing::debug!(id = %ctx.request_id(), book_id = %book.id, "Added book");

        Ok(AddBookResponse { id: book.id })
    }

    /// Apply the non-empty fields of `request` and return the stored result.
    pub async fn update_book(
        &self,
        ctx: &RequestContext,
        id: BookId,
        request: UpdateBookRequest,
    ) -> Result<Book> {
        let mut book = self.get_book(ctx, id).await?;
        request.apply_to(&mut book);

        self.store.update_book(&book).await?;
        tracing::debug!(id = %ctx.request_id(), book_id = %id, "Updated book");

        self.get_book(ctx, id).await
    }

    pub async fn delete_book(&self, ctx: &RequestContext, id: BookId) -> Result<DeleteBookResponse> {
        let book = self.get_book(ctx, id).await?;

        self.store.delete_book(&book).await?;
        tracing::debug!(id = %ctx.request_id(), book_id = %id, "Deleted book");

        Ok(DeleteBookResponse {})
    }

    /// Fetch one book, or a `NotFound` error.
    pub async fn get_book(&self, _ctx: &RequestContext, id: BookId) -> Result<Book> {
        match self.store.get_book(id).await? {
            Some(book) => Ok(book),
            None => Err(Error::not_found(BOOK_NOT_FOUND)),
        }
    }

    /// Fetch one page of books.
    pub async fn get_books(
        &self,
        ctx: &RequestContext,
        request: PageRequest,
    ) -> Result<GetBooksResponse> {
        let (pagination, books) = self.store.get_books(request).await?;
        tracing::debug!(
            id = %ctx.request_id(),
            page = pagination.page,
            returned = books.len(),
            "Listed books"
        );

        Ok(GetBooksResponse { books, pagination })
    }
}

impl std::fmt::Debug for BookService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bookshelf_core::{ErrorKind, PageResult, SortDirection};
    use bookshelf_store::MemoryStore;

    fn ctx() -> RequestContext {
        RequestContext::new("test")
    }

    fn add_request(title: &str, author: &str, description: &str) -> AddBookRequest {
        AddBookRequest {
            title: title.to_string(),
            author: author.to_string(),
            description: description.to_string(),
        }
    }

    fn service() -> BookService {
        BookService::new(Arc::new(MemoryStore::new()))
    }

    /// A store whose every operation fails.
    struct FailingStore;

    fn broken() -> Error {
        Error::other(std::io::Error::other("connection reset"))
    }

    #[async_trait]
    impl DataStore for FailingStore {
        async fn create_book(&self, _book: NewBook) -> Result<Book> {
            Err(broken())
        }

        async fn update_book(&self, _book: &Book) -> Result<()> {
            Err(broken())
        }

        async fn delete_book(&self, _book: &Book) -> Result<()> {
            Err(broken())
        }

        async fn get_book(&self, _id: BookId) -> Result<Option<Book>> {
            Err(broken())
        }

        async fn get_books(&self, _request: PageRequest) -> Result<(PageResult, Vec<Book>)> {
            Err(broken())
        }
    }

    #[tokio::test]
    async fn test_add_book() {
        let service = service();
        let response = service
            .add_book(&ctx(), add_request("Dune", "Herbert", "Spice"))
            .await
            .unwrap();
        assert_eq!(response.id, BookId(1));

        let book = service.get_book(&ctx(), response.id).await.unwrap();
        assert_eq!(book.title, "Dune");
    }

    #[tokio::test]
    async fn test_add_book_validation() {
        let err = service()
            .add_book(&ctx(), add_request("", "Herbert", ""))
            .await
            .unwrap_err();

        let api = err.to_api_error();
        assert!(api.is(ErrorKind::InvalidInput));
        let fields: serde_json::Value = serde_json::from_str(api.message()).unwrap();
        assert_eq!(fields["title"], "It is required");
        assert_eq!(fields["description"], "It is required");
        assert!(fields.get("author").is_none());
    }

    #[tokio::test]
    async fn test_get_missing_book() {
        let err = service().get_book(&ctx(), BookId(42)).await.unwrap_err();
        let api = err.to_api_error();
        assert!(api.is(ErrorKind::NotFound));
        assert_eq!(api.message(), BOOK_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_book_keeps_empty_fields() {
        let service = service();
        let id = service
            .add_book(&ctx(), add_request("Dune", "Herbert", "Spice"))
            .await
            .unwrap()
            .id;

        let updated = service
            .update_book(
                &ctx(),
                id,
                UpdateBookRequest {
                    title: "Dune Messiah".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(updated.author, "Herbert");
        assert_eq!(updated.description, "Spice");
    }

    /// Upper-cases titles on update, like a store-side trigger would.
    struct NormalizingStore(MemoryStore);

    #[async_trait]
    impl DataStore for NormalizingStore {
        async fn create_book(&self, book: NewBook) -> Result<Book> {
            self.0.create_book(book).await
        }

        async fn update_book(&self, book: &Book) -> Result<()> {
            let mut stored = book.clone();
            stored.title = stored.title.to_uppercase();
            self.0.update_book(&stored).await
        }

        async fn delete_book(&self, book: &Book) -> Result<()> {
            self.0.delete_book(book).await
        }

        async fn get_book(&self, id: BookId) -> Result<Option<Book>> {
            self.0.get_book(id).await
        }

        async fn get_books(&self, request: PageRequest) -> Result<(PageResult, Vec<Book>)> {
            self.0.get_books(request).await
        }
    }

    #[tokio::test]
    async fn test_update_book_returns_stored_record() {
        let service = BookService::new(Arc::new(NormalizingStore(MemoryStore::new())));
        let id = service
            .add_book(&ctx(), add_request("dune", "Herbert", "Spice"))
            .await
            .unwrap()
            .id;

        let updated = service
            .update_book(
                &ctx(),
                id,
                UpdateBookRequest {
                    title: "dune messiah".to_string(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.title, "DUNE MESSIAH");
        assert_eq!(updated.author, "Herbert");
    }

    #[tokio::test]
    async fn test_update_missing_book() {
        let err = service()
            .update_book(&ctx(), BookId(3), UpdateBookRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_book() {
        let service = service();
        let id = service
            .add_book(&ctx(), add_request("a", "b", "c"))
            .await
            .unwrap()
            .id;

        service.delete_book(&ctx(), id).await.unwrap();

        let err = service.delete_book(&ctx(), id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_get_books() {
        let service = service();
        for title in ["a", "b", "c"] {
            service
                .add_book(&ctx(), add_request(title, "x", "y"))
                .await
                .unwrap();
        }

        let response = service
            .get_books(&ctx(), PageRequest::new(1, 2, SortDirection::Asc))
            .await
            .unwrap();

        assert_eq!(response.books.len(), 2);
        assert_eq!(response.books[0].title, "a");
        assert_eq!(response.pagination.total_rows, 3);
        assert_eq!(response.pagination.total_pages, 2);
    }

    #[tokio::test]
    async fn test_store_failures_are_internal() {
        let service = BookService::new(Arc::new(FailingStore));

        let err = service
            .add_book(&ctx(), add_request("a", "b", "c"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err = service.get_book(&ctx(), BookId(1)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let err = service
            .get_books(&ctx(), PageRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_validation_runs_before_store() {
        let service = BookService::new(Arc::new(FailingStore));
        let err = service
            .add_book(&ctx(), AddBookRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
