//! Request middleware: request IDs and access logging.

pub mod access_log;
pub mod request_id;

use axum::{Router, middleware::from_fn};

pub use access_log::log_access;
pub use request_id::{REQUEST_ID_HEADER, inject_request_id};

/// Apply the request middleware to a router.
///
/// The access logger is the outermost layer so that it observes the final
/// status and the request ID assigned further in.
pub fn wrap(router: Router) -> Router {
    router
        .layer(from_fn(inject_request_id))
        .layer(from_fn(log_access))
}
