//! bookshelf-server: HTTP API server for the bookshelf service
//!
//! This crate provides:
//! - REST endpoints for creating, reading, updating, listing and deleting books
//! - The book service holding the business rules
//! - Request ID and access logging middleware
//! - Extractors that report rejected input as JSON errors
//! - A single JSON response writer used for every outcome
//!
//! # Architecture
//!
//! The server is built on Axum. Each request gets a [`RequestContext`]
//! carrying its request ID; the context is passed explicitly to the service
//! and to the response writer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use bookshelf_server::{build_app, AppState, ServerConfig};
//! use bookshelf_store::MemoryStore;
//!
//! let state = AppState::new(Arc::new(MemoryStore::new()), ServerConfig::from_env()?);
//! let app = build_app(state);
//! ```

pub mod config;
pub mod context;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;

use axum::Router;

// Re-exports for convenience
pub use config::{ConfigError, LogFormat, ServerConfig, StorageBackend};
pub use context::RequestContext;
pub use service::BookService;
pub use state::AppState;

// Re-export dependent crates
pub use bookshelf_core;
pub use bookshelf_store;

/// Build the router with every route and the request middleware applied.
pub fn build_app(state: AppState) -> Router {
    middleware::wrap(routes::build_router(state))
}
