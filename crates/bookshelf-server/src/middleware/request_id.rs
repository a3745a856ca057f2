//! Request ID middleware for tracing requests.

use axum::{extract::Request, middleware::Next, response::Response};
use http::HeaderValue;

use crate::context::RequestContext;

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assign a fresh request ID to every request.
///
/// Any inbound `x-request-id` is replaced. The ID is stored as a
/// [`RequestContext`] in the request extensions for handlers, and in the
/// response extensions for the access logger, and echoed in the response
/// header.
pub async fn inject_request_id(mut request: Request, next: Next) -> Response {
    let ctx = RequestContext::generate();
    let header = HeaderValue::from_str(ctx.request_id()).ok();

    match &header {
        Some(value) => {
            request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
        }
        None => {
            request.headers_mut().remove(REQUEST_ID_HEADER);
        }
    }
    request.extensions_mut().insert(ctx.clone());

    let mut response = next.run(request).await;

    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response.extensions_mut().insert(ctx);

    response
}
