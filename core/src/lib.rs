//! Synchronous HTTP request engine.
//!
//! # Overview
//! Turns a caller-populated `HttpRequest` into a wire-level request
//! (query string, form body, multipart body, or raw text), hands it to a
//! `Transport`, and reduces whatever comes back to a uniform `HttpResponse`
//! with an explicit `ResponseStatus`.
//!
//! # Design
//! - `RestClient` is stateless apart from its transport and config.
//! - Preparation (`build_request`) is split from I/O, so encoding and header
//!   dispatch are deterministic and testable without a network.
//! - Only header contract violations are returned as `Err`. Transport
//!   failures become `ResponseStatus::Error`; HTTP error statuses are
//!   `Success` and left to the caller to interpret.
//! - `UreqTransport` is the bundled blocking transport.

pub mod casing;
pub mod classifier;
pub mod client;
pub mod config;
pub mod dates;
pub mod encoder;
pub mod error;
pub mod headers;
pub mod http;
pub mod transport;
pub mod ureq_transport;

pub use client::RestClient;
pub use config::{Boundary, ClientConfig};
pub use error::{HttpError, TransportError};
pub use http::{
    Credentials, HttpFile, HttpHeader, HttpMethod, HttpParameter, HttpRequest, HttpResponse,
    ResponseStatus,
};
pub use transport::{RawResponse, Transport, TransportOutcome, WireRequest};
pub use ureq_transport::UreqTransport;
