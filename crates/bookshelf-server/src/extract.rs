//! Request extractors whose rejections go through the response writer.
//!
//! axum's own `Path` and `Bytes` extractors answer rejected input with a
//! plain-text body. These wrap them so that every rejection becomes an
//! `InvalidInput` error written as `{"message": ...}`.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use bookshelf_core::{BookId, Error};
use serde::de::DeserializeOwned;

use crate::context::RequestContext;
use crate::response::Failure;

/// Parse a book identity from a path segment.
pub fn parse_book_id(raw: &str) -> Result<BookId, Error> {
    raw.parse()
        .map_err(|_| Error::invalid_input(format!("invalid id: {}", raw)))
}

/// The `{id}` path segment of a book route, parsed as a [`BookId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookIdPath(pub BookId);

impl<S> FromRequestParts<S> for BookIdPath
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_extensions(&parts.extensions);

        let parsed = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => parse_book_id(&raw),
            // Undecodable segment: report it as it appeared in the URI.
            Err(_) => {
                let raw = parts.uri.path().rsplit('/').next().unwrap_or_default();
                Err(Error::invalid_input(format!("invalid id: {}", raw)))
            }
        };

        parsed
            .map(BookIdPath)
            .map_err(|error| Failure::new(ctx, error))
    }
}

/// A JSON request body.
///
/// Unreadable bodies (including ones over the size limit) and malformed
/// JSON are both `InvalidInput`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_extensions(req.extensions());

        let decoded = match Bytes::from_request(req, state).await {
            Ok(body) => decode_body(&body),
            Err(rejection) => Err(Error::invalid_input(format!(
                "invalid request body: {}",
                rejection.body_text()
            ))),
        };

        decoded
            .map(JsonBody)
            .map_err(|error| Failure::new(ctx, error))
    }
}

fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body)
        .map_err(|err| Error::invalid_input(format!("invalid request body: {}", err)))
}
