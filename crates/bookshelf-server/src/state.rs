//! Application state shared across handlers.

use std::sync::Arc;

use bookshelf_core::DataStore;

use crate::config::ServerConfig;
use crate::service::BookService;

/// Application state shared across all handlers.
///
/// This is cloneable and can be extracted in handlers using `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// Book operations over the configured store.
    books: BookService,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn DataStore>, config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            books: BookService::new(store),
        }
    }

    /// Get the book service.
    pub fn books(&self) -> &BookService {
        &self.books
    }

    /// Get a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
