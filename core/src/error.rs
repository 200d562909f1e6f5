//! Error types for the request engine.
//!
//! # Design
//! Only caller-side contract violations escape as `HttpError`; they are
//! detected while preparing the request, before anything touches the
//! network. Transport trouble is reported through `TransportError`, which
//! the classifier folds into `HttpResponse::error_message` and never
//! returns to the caller.

use thiserror::Error;

/// Failures raised while preparing a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HttpError {
    /// The header names a capability the engine does not implement
    /// (byte-range requests).
    #[error("header `{0}` is not supported")]
    UnsupportedHeader(String),

    /// A restricted header carried a value its typed setter cannot parse.
    #[error("invalid value {value:?} for header `{name}`: {reason}")]
    InvalidHeaderValue {
        name: String,
        value: String,
        reason: String,
    },
}

/// Failures observed while performing the call or reading its response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, DNS, timeout or request construction failure with no
    /// response to inspect.
    #[error("{0}")]
    Failure(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    BodyRead(String),
}
