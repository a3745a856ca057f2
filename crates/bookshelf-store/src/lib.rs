//! bookshelf-store: Storage layer for the bookshelf service
//!
//! This crate provides:
//! - PostgreSQL storage for books via sqlx
//! - An in-memory store for development and tests
//! - Migration management
//!
//! Both stores implement [`bookshelf_core::DataStore`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use bookshelf_store::{Store, StoreConfig};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//!
//! let book = store.create_book(new_book).await?;
//! ```

pub mod error;
pub mod memory;
pub mod models;
pub mod schema;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use models::BookRow;
pub use store::{Store, StoreConfig};

// Re-export bookshelf-core for downstream crates
pub use bookshelf_core;
