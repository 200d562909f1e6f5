//! Request and response records exchanged with the engine.
//!
//! # Design
//! These types describe an HTTP call as plain data. Callers (DTO mappers,
//! request builders, auth helpers) populate an `HttpRequest` and receive an
//! `HttpResponse`; everything in between is owned by the core. All fields use
//! owned types so records can be moved across threads or stored freely.

use std::fmt;

use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Content type used for file parts that do not name their own.
pub const DEFAULT_FILE_CONTENT_TYPE: &str = "application/octet-stream";

/// The six verbs the engine can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Delete,
    Post,
    Put,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
        }
    }

    /// Whether the verb carries an encoded body. GET-style verbs put their
    /// parameters in the query string instead.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named request header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A named query-string or form parameter. Duplicates are allowed and are
/// serialized in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpParameter {
    pub name: String,
    pub value: String,
}

impl HttpParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A file attachment sent as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpFile {
    pub name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl HttpFile {
    pub fn new(name: impl Into<String>, file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Username/password pair sent as HTTP Basic authorization.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// `Authorization` header value for these credentials.
    pub fn basic_authorization(&self) -> String {
        let pair = format!("{}:{}", self.username, self.password);
        format!("Basic {}", BASE64_STANDARD.encode(pair))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Everything the caller supplies for one call.
///
/// When `files` is non-empty the body is always multipart and `body` is
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    pub url: String,
    pub credentials: Option<Credentials>,
    pub proxy: Option<String>,
    pub headers: Vec<HttpHeader>,
    pub parameters: Vec<HttpParameter>,
    pub files: Vec<HttpFile>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    pub fn has_body(&self) -> bool {
        self.body.as_deref().is_some_and(|b| !b.is_empty())
    }
}

/// Whether the transport call itself succeeded. Independent of the HTTP
/// status code: a 404 that came back over the wire is `Success`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    #[default]
    None,
    Success,
    Error,
}

/// The uniform record returned for every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpResponse {
    pub status: ResponseStatus,
    pub status_code: u16,
    pub status_description: String,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub content_encoding: Option<String>,
    pub content: String,
    pub response_uri: Option<String>,
    pub server: Option<String>,
    pub headers: Vec<(String, String)>,
    pub error_message: Option<String>,
}

impl HttpResponse {
    /// Case-insensitive lookup of a response header.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}
