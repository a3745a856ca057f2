//! The single place where handler outcomes become HTTP responses.

use axum::{
    body::Body,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use bookshelf_core::{ApiError, Error};
use serde::Serialize;

use crate::context::RequestContext;

const APPLICATION_JSON: &str = "application/json";
const APPLICATION_JSON_UTF8: &str = "application/json; charset=utf-8";
const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Serialize `data` as the JSON body of a response with `status`.
///
/// If serialization fails the response degrades to a plain-text 500.
pub fn write<T: Serialize>(ctx: &RequestContext, status: StatusCode, data: &T) -> Response {
    match serde_json::to_vec(data) {
        Ok(body) => build(status, APPLICATION_JSON, body),
        Err(err) => {
            tracing::error!(
                id = %ctx.request_id(),
                "failed to write response: {}",
                err
            );
            let internal = ApiError::internal();
            plain_text(status_of(&internal), internal.message())
        }
    }
}

/// Log `err` and write it as a `{"message": ...}` body with the status of
/// its classified [`ApiError`].
pub fn write_error(ctx: &RequestContext, err: &Error) -> Response {
    match err.location() {
        Some(location) => tracing::error!(
            id = %ctx.request_id(),
            location = %location,
            "{}",
            err
        ),
        None => tracing::error!(id = %ctx.request_id(), "{}", err),
    }

    let api_error = err.to_api_error();
    let status = status_of(&api_error);

    match serde_json::to_vec(&api_error) {
        Ok(body) => {
            let mut response = build(status, APPLICATION_JSON_UTF8, body);
            response.headers_mut().insert(
                header::X_CONTENT_TYPE_OPTIONS,
                HeaderValue::from_static("nosniff"),
            );
            response
        }
        Err(serialize_err) => {
            tracing::error!(
                id = %ctx.request_id(),
                "failed to write error response: {}",
                serialize_err
            );
            plain_text(status, api_error.message())
        }
    }
}

/// A successful handler outcome, written by [`write`].
#[derive(Debug)]
pub struct Reply<T> {
    ctx: RequestContext,
    status: StatusCode,
    data: T,
}

impl<T> Reply<T> {
    pub fn new(ctx: RequestContext, status: StatusCode, data: T) -> Self {
        Self { ctx, status, data }
    }

    /// 200 OK.
    pub fn ok(ctx: RequestContext, data: T) -> Self {
        Self::new(ctx, StatusCode::OK, data)
    }

    /// 201 Created.
    pub fn created(ctx: RequestContext, data: T) -> Self {
        Self::new(ctx, StatusCode::CREATED, data)
    }
}

impl<T: Serialize> IntoResponse for Reply<T> {
    fn into_response(self) -> Response {
        write(&self.ctx, self.status, &self.data)
    }
}

/// A failed handler outcome, written by [`write_error`].
#[derive(Debug)]
pub struct Failure {
    ctx: RequestContext,
    error: Error,
}

impl Failure {
    pub fn new(ctx: RequestContext, error: Error) -> Self {
        Self { ctx, error }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        write_error(&self.ctx, &self.error)
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<Reply<T>, Failure>;

/// Attach the request context to an error so that `?` can return it from a
/// handler.
pub trait WithContext<T> {
    fn with_ctx(self, ctx: &RequestContext) -> Result<T, Failure>;
}

impl<T> WithContext<T> for Result<T, Error> {
    fn with_ctx(self, ctx: &RequestContext) -> Result<T, Failure> {
        self.map_err(|error| Failure::new(ctx.clone(), error))
    }
}

fn status_of(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(err.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

fn build(status: StatusCode, content_type: &'static str, body: Vec<u8>) -> Response {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

fn plain_text(status: StatusCode, message: &str) -> Response {
    let mut response = build(status, TEXT_PLAIN_UTF8, format!("{}\n", message).into_bytes());
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
