//! Verb entry points.
//!
//! # Design
//! `RestClient` owns a `Transport` and a `ClientConfig` and carries no other
//! state between calls. Each verb is split into `build_request`, which turns
//! an `HttpRequest` into a `WireRequest` without touching the network, and
//! the transport call whose outcome is handed to the classifier. Header
//! problems surface from `build_request`, so they fail before any I/O.

use log::debug;

use crate::classifier::classify;
use crate::config::ClientConfig;
use crate::encoder::{append_query, encode_body, encode_parameters};
use crate::error::HttpError;
use crate::headers::{apply_headers, OutgoingHeaders};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{Transport, WireRequest};

/// Synchronous client; every verb blocks until the transport returns.
#[derive(Debug, Clone)]
pub struct RestClient<T> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> RestClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn get(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Get, request)
    }

    pub fn head(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Head, request)
    }

    pub fn options(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Options, request)
    }

    pub fn delete(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Delete, request)
    }

    pub fn post(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Post, request)
    }

    pub fn put(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        self.execute(HttpMethod::Put, request)
    }

    /// Build, send and classify. Only header errors are returned as `Err`;
    /// transport trouble is reported through `HttpResponse::status`.
    pub fn execute(&self, method: HttpMethod, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let wire = self.build_request(method, request)?;
        debug!(
            "{} {} ({} body bytes)",
            wire.method,
            wire.url,
            wire.body.as_ref().map_or(0, Vec::len)
        );
        Ok(classify(self.transport.execute(wire)))
    }

    /// Prepare the request that `method` would send, without sending it.
    pub fn build_request(&self, method: HttpMethod, request: &HttpRequest) -> Result<WireRequest, HttpError> {
        if method.has_body() {
            self.build_body_request(method, request)
        } else {
            build_query_request(method, request)
        }
    }

    fn build_body_request(&self, method: HttpMethod, request: &HttpRequest) -> Result<WireRequest, HttpError> {
        let mut headers = OutgoingHeaders::default();
        let mut body = None;

        let boundary = if request.has_files() {
            self.config.boundary.token()
        } else {
            String::new()
        };
        if let Some(encoded) = encode_body(
            &request.parameters,
            &request.files,
            request.body.as_deref(),
            &boundary,
        ) {
            headers.content_type = Some(encoded.content_type);
            headers.content_length = Some(encoded.bytes.len() as u64);
            body = Some(encoded.bytes);
        }
        apply_headers(&mut headers, &request.headers)?;

        Ok(WireRequest {
            method,
            url: request.url.clone(),
            credentials: request.credentials.clone(),
            proxy: request.proxy.clone(),
            headers,
            body,
        })
    }
}

// GET-style verbs never send a body, even when one was supplied.
fn build_query_request(method: HttpMethod, request: &HttpRequest) -> Result<WireRequest, HttpError> {
    let mut headers = OutgoingHeaders::default();
    apply_headers(&mut headers, &request.headers)?;

    Ok(WireRequest {
        method,
        url: append_query(&request.url, &encode_parameters(&request.parameters)),
        credentials: request.credentials.clone(),
        proxy: request.proxy.clone(),
        headers,
        body: None,
    })
}
