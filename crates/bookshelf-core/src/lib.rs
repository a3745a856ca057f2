//! bookshelf-core: Core types for the bookshelf service
//!
//! This crate provides:
//! - The `Book` record and the request/response bodies of the HTTP API
//! - The typed API error model with wrapping and cause-chain classification
//! - Page/limit/sort normalization and page count derivation
//! - The `DataStore` trait implemented by the storage backends
//!
//! Nothing in here performs I/O. The store and server crates build on it.

pub mod error;
pub mod pagination;
pub mod provider;
pub mod types;

pub use error::{ApiError, BoxError, Error, ErrorKind, ResultExt, ValidationErrors};
pub use pagination::{PageRequest, PageResult, SortDirection};
pub use provider::DataStore;
pub use types::*;

/// Result type used across the service and store seams.
pub type Result<T, E = Error> = std::result::Result<T, E>;
