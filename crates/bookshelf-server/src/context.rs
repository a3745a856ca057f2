//! Per-request context threaded through handlers, the service, and the
//! response writer.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{Extensions, request::Parts},
};
use uuid::Uuid;

/// Request ID reported when a request never passed through the request ID
/// middleware.
pub const REQUEST_ID_UNKNOWN: &str = "unknown";

/// Context for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    request_id: String,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Context with a fresh random request ID.
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Context for a request without an assigned ID.
    pub fn unknown() -> Self {
        Self::new(REQUEST_ID_UNKNOWN)
    }

    /// Context installed in `extensions`, or [`RequestContext::unknown`].
    pub fn from_extensions(extensions: &Extensions) -> Self {
        extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::unknown)
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }
}

/// Reads the context installed by the request ID middleware, falling back to
/// [`RequestContext::unknown`].
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_extensions(&parts.extensions))
    }
}
