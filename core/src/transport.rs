//! The seam between request preparation and socket I/O.
//!
//! # Design
//! The core never opens a connection itself. It hands a fully prepared
//! `WireRequest` to a `Transport` and gets back a `TransportOutcome`, which
//! distinguishes a plain response, a response the transport flagged as an
//! error (4xx/5xx), and a failure with no response at all. Keeping the middle
//! case separate lets the classifier still read the status code and body of
//! an error response.

use std::fmt;
use std::io::{Cursor, Read};

use crate::error::TransportError;
use crate::headers::OutgoingHeaders;
use crate::http::{Credentials, HttpMethod};

/// A request ready to go on the wire.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: HttpMethod,
    /// Final URL, query string included.
    pub url: String,
    pub credentials: Option<Credentials>,
    pub proxy: Option<String>,
    pub headers: OutgoingHeaders,
    /// Always `None` for GET-style verbs.
    pub body: Option<Vec<u8>>,
}

/// A response as delivered by the transport, body still unread.
///
/// The body reader is owned here and released when the value is dropped,
/// whether or not it was read to the end.
pub struct RawResponse {
    pub status_code: u16,
    pub status_description: String,
    pub headers: Vec<(String, String)>,
    /// URI the response finally came from, after redirects.
    pub response_uri: Option<String>,
    pub body: Box<dyn Read>,
}

impl RawResponse {
    /// A response whose body is already in memory.
    pub fn from_bytes(status_code: u16, status_description: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status_code,
            status_description: status_description.to_string(),
            headers: Vec::new(),
            response_uri: None,
            body: Box::new(Cursor::new(body.into())),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_response_uri(mut self, uri: &str) -> Self {
        self.response_uri = Some(uri.to_string());
        self
    }

    /// Case-insensitive header lookup; the first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status_code", &self.status_code)
            .field("status_description", &self.status_description)
            .field("headers", &self.headers)
            .field("response_uri", &self.response_uri)
            .finish_non_exhaustive()
    }
}

/// Result of one transport call.
#[derive(Debug)]
pub enum TransportOutcome {
    /// The call completed normally.
    Response(RawResponse),
    /// The transport reported an error but a response came back with it.
    ProtocolError { response: RawResponse, message: String },
    /// No response: connection, DNS, timeout, or request construction failed.
    Failed(TransportError),
}

/// Performs one blocking HTTP call.
pub trait Transport {
    fn execute(&self, request: WireRequest) -> TransportOutcome;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: WireRequest) -> TransportOutcome {
        (**self).execute(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn execute(&self, request: WireRequest) -> TransportOutcome {
        (**self).execute(request)
    }
}
