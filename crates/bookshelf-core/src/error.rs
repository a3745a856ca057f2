//! Typed API errors, context wrapping, and cause-chain classification.
//!
//! Errors produced anywhere in the service travel as [`Error`]. An [`Error`]
//! is either a typed [`ApiError`], an untyped failure from a collaborator
//! (usually the database), or a context message wrapped around another
//! [`Error`]. The transport boundary collapses the chain with
//! [`Error::to_api_error`], which always yields a well-formed [`ApiError`].

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::panic::Location;

use serde::{Deserialize, Serialize};

/// Boxed error from a collaborator that has no typed classification.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Validation rule reported for a field that must be present.
pub const RULE_REQUIRED: &str = "required";

/// Validation rule reported for a field that must be an email address.
pub const RULE_EMAIL: &str = "email";

// ============================================================================
// Error kinds
// ============================================================================

/// The classifications an outgoing error can have.
///
/// Each kind is a constant `(code, default message)` pair. Call sites build a
/// fresh [`ApiError`] from it; there is no shared error instance to mutate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed request shape or values, or failed field validation (400).
    InvalidInput,
    /// The referenced record does not exist (404).
    NotFound,
    /// Everything else (500).
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    #[must_use]
    pub const fn code(self) -> u16 {
        match self {
            Self::InvalidInput => 400,
            Self::NotFound => 404,
            Self::Internal => 500,
        }
    }

    /// Message used when no custom message is supplied.
    #[must_use]
    pub const fn default_message(self) -> &'static str {
        match self {
            Self::InvalidInput => "Bad Request",
            Self::NotFound => "Not Found",
            Self::Internal => "Internal Server Error",
        }
    }

    /// Classify a status code. Anything unrecognized is `Internal`.
    #[must_use]
    pub const fn from_code(code: u16) -> Self {
        match code {
            400 => Self::InvalidInput,
            404 => Self::NotFound,
            _ => Self::Internal,
        }
    }

    /// Build the sentinel error for this kind with its default message.
    #[must_use]
    pub fn error(self) -> ApiError {
        ApiError::new(self.code(), self.default_message())
    }

    /// Build the sentinel error for this kind with a custom message.
    #[must_use]
    pub fn with_message(self, message: impl Into<String>) -> ApiError {
        ApiError::new(self.code(), message)
    }
}

// ============================================================================
// ApiError
// ============================================================================

/// Typed error returned to transport callers.
///
/// Only the message is part of the wire body; the code becomes the HTTP
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    #[serde(skip)]
    code: u16,
    message: String,
}

impl ApiError {
    /// Create an error with an explicit status code and message.
    #[must_use]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The generic internal error every unclassified failure collapses to.
    #[must_use]
    pub fn internal() -> Self {
        ErrorKind::Internal.error()
    }

    /// HTTP status code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Classification derived from the status code.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_code(self.code)
    }

    /// Whether this error is of the given kind.
    #[must_use]
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }

    /// Copy of this error with the message replaced and the code kept.
    #[must_use]
    pub fn with_message(&self, message: impl Into<String>) -> Self {
        Self::new(self.code, message)
    }

    /// Wrap this error with a context message.
    #[track_caller]
    pub fn wrap(self, message: impl Into<String>) -> Error {
        Error::Api(self).wrap(message)
    }
}

// ============================================================================
// Error chain
// ============================================================================

/// An error with an optional cause chain.
///
/// `Wrapped` nodes add context and point at their cause. The innermost
/// `Wrapped` node records the source location where wrapping started.
#[derive(Debug)]
pub enum Error {
    /// A typed, classified error.
    Api(ApiError),
    /// A context message around a cause.
    Wrapped {
        message: String,
        source: Box<Error>,
        location: Option<&'static Location<'static>>,
    },
    /// An untyped failure from a collaborator.
    Other(BoxError),
}

impl Error {
    /// Box an untyped failure.
    pub fn other(err: impl Into<BoxError>) -> Self {
        Self::Other(err.into())
    }

    /// `InvalidInput` with a custom message.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::Api(ErrorKind::InvalidInput.with_message(message))
    }

    /// `NotFound` with a custom message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::Api(ErrorKind::NotFound.with_message(message))
    }

    /// `Internal` with a custom message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Api(ErrorKind::Internal.with_message(message))
    }

    /// Wrap this error with a context message.
    ///
    /// The caller's location is recorded unless some node further down the
    /// chain already carries one.
    #[track_caller]
    pub fn wrap(self, message: impl Into<String>) -> Self {
        let location = match self.location() {
            Some(_) => None,
            None => Some(Location::caller()),
        };

        Self::Wrapped {
            message: message.into(),
            source: Box::new(self),
            location,
        }
    }

    /// The next error in the cause chain, if this node wraps one.
    #[must_use]
    pub fn cause(&self) -> Option<&Error> {
        match self {
            Self::Wrapped { source, .. } => Some(&**source),
            _ => None,
        }
    }

    /// First recorded wrap location found along the cause chain.
    #[must_use]
    pub fn location(&self) -> Option<&'static Location<'static>> {
        let mut current = self;
        loop {
            match current {
                Self::Wrapped {
                    location: Some(location),
                    ..
                } => return Some(*location),
                Self::Wrapped { source, .. } => current = &**source,
                _ => return None,
            }
        }
    }

    /// Collapse the chain to the first typed error it contains.
    ///
    /// Walks `Wrapped` causes first, then the `source()` chain of an untyped
    /// failure. Falls back to [`ApiError::internal`] when nothing typed is
    /// found.
    #[must_use]
    pub fn to_api_error(&self) -> ApiError {
        let mut current = self;
        loop {
            match current {
                Self::Api(err) => return err.clone(),
                Self::Wrapped { source, .. } => current = &**source,
                Self::Other(err) => {
                    return find_api_error(&**err).unwrap_or_else(ApiError::internal);
                }
            }
        }
    }

    /// Classification of this error after collapsing the chain.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.to_api_error().kind()
    }
}

fn find_api_error(err: &(dyn StdError + 'static)) -> Option<ApiError> {
    let mut next = Some(err);
    while let Some(err) = next {
        if let Some(api) = err.downcast_ref::<ApiError>() {
            return Some(api.clone());
        }
        if let Some(inner) = err.downcast_ref::<Error>() {
            return Some(inner.to_api_error());
        }
        next = err.source();
    }
    None
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(err) => fmt::Display::fmt(err, f),
            Self::Wrapped {
                message, source, ..
            } => write!(f, "{message}: {source}"),
            Self::Other(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Api(_) => None,
            Self::Wrapped { source, .. } => Some(&**source),
            Self::Other(err) => Some(&**err),
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

/// Context wrapping for `Result`s.
///
/// An `Ok` passes through untouched, so a function's return value can be
/// wrapped unconditionally.
pub trait ResultExt<T> {
    /// Wrap the error, if any, with a context message.
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error>;

    /// Wrap the error, if any, with a lazily built context message.
    fn wrap_err_with<S, F>(self, f: F) -> Result<T, Error>
    where
        S: Into<String>,
        F: FnOnce() -> S;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<Error>,
{
    #[track_caller]
    fn wrap_err(self, message: impl Into<String>) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into().wrap(message)),
        }
    }

    #[track_caller]
    fn wrap_err_with<S, F>(self, f: F) -> Result<T, Error>
    where
        S: Into<String>,
        F: FnOnce() -> S,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into().wrap(f())),
        }
    }
}

// ============================================================================
// Validation errors
// ============================================================================

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `field` failed `rule`. A later failure replaces an earlier
    /// one for the same field.
    pub fn add(&mut self, field: impl Into<String>, rule: impl Into<String>) {
        self.fields.insert(field.into(), rule.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Rule recorded for a field.
    #[must_use]
    pub fn rule(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// `Ok(())` when nothing failed, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    /// Translate into an `InvalidInput` error whose message is a JSON object
    /// mapping each failing field to a human-readable message.
    #[must_use]
    pub fn to_api_error(&self) -> ApiError {
        let messages: BTreeMap<&str, &str> = self
            .fields
            .iter()
            .map(|(field, rule)| (field.as_str(), rule_message(rule)))
            .collect();

        match serde_json::to_string(&messages) {
            Ok(json) => ErrorKind::InvalidInput.with_message(json),
            Err(e) => ErrorKind::Internal.with_message(e.to_string()),
        }
    }
}

/// Human-readable message for a validation rule.
#[must_use]
pub fn rule_message(rule: &str) -> &'static str {
    match rule {
        RULE_REQUIRED => "It is required",
        RULE_EMAIL => "It is not a valid email address",
        _ => "It is invalid",
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        errors.to_api_error()
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Api(errors.to_api_error())
    }
}
