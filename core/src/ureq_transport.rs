//! `Transport` backed by a blocking `ureq` agent.
//!
//! The agent is configured not to treat status codes as errors, so every
//! response that comes back is returned with its body. Responses with a
//! status of 400 or above are reported as `TransportOutcome::ProtocolError`
//! to mirror transports that raise on error statuses.
//!
//! ureq does not expose the reason phrase the server sent, so
//! `status_description` is the canonical phrase for the code, or the bare
//! code when the code has none (e.g. `599`).
//!
//! A request marked `send_chunked` has its body streamed from a reader, which
//! the agent frames as `Transfer-Encoding: chunked`.

use std::io::Cursor;
use std::time::Duration;

use log::{debug, warn};
use ureq::http::{self, Response, StatusCode};
use ureq::{Agent, Body, Proxy, ResponseExt, SendBody};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::transport::{RawResponse, Transport, TransportOutcome, WireRequest};

/// Headers that describe body framing. The agent derives these from the
/// body it sends (fixed length, or chunked when `send_chunked` is set), so
/// caller-supplied values are not forwarded.
const FRAMING_HEADERS: &[&str] = &["content-length", "transfer-encoding"];

#[derive(Debug, Clone, Default)]
pub struct UreqTransport {
    timeout: Option<Duration>,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            timeout: config.timeout(),
        }
    }

    fn agent(&self, proxy: Option<&str>) -> Result<Agent, ureq::Error> {
        let mut builder = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(self.timeout);
        if let Some(proxy) = proxy {
            builder = builder.proxy(Some(Proxy::new(proxy)?));
        }
        Ok(builder.build().new_agent())
    }

    fn send(&self, request: WireRequest) -> Result<Response<Body>, String> {
        let agent = self.agent(request.proxy.as_deref()).map_err(|e| e.to_string())?;

        let mut builder = http::Request::builder()
            .method(request.method.as_str())
            .uri(request.url.as_str());
        if let Some(credentials) = &request.credentials {
            builder = builder.header(http::header::AUTHORIZATION, credentials.basic_authorization());
        }
        for (name, value) in request.headers.to_pairs() {
            if FRAMING_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(&name)) {
                debug!("leaving {name} to the agent");
                continue;
            }
            builder = builder.header(name, value);
        }

        match request.body {
            Some(body) if request.headers.send_chunked => {
                let mut reader = Cursor::new(body);
                let req = builder
                    .body(SendBody::from_reader(&mut reader))
                    .map_err(|e| e.to_string())?;
                agent.run(req).map_err(|e| e.to_string())
            }
            Some(body) => {
                let req = builder.body(body.as_slice()).map_err(|e| e.to_string())?;
                agent.run(req).map_err(|e| e.to_string())
            }
            None => {
                let req = builder.body(()).map_err(|e| e.to_string())?;
                agent.run(req).map_err(|e| e.to_string())
            }
        }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: WireRequest) -> TransportOutcome {
        let target = format!("{} {}", request.method, request.url);
        let response = match self.send(request) {
            Ok(response) => response,
            Err(message) => {
                warn!("{target} failed: {message}");
                return TransportOutcome::Failed(TransportError::Failure(message));
            }
        };

        let raw = into_raw(response);
        debug!("{target} -> {}", raw.status_code);
        if raw.status_code >= 400 {
            let message = format!(
                "the remote server returned an error: ({}) {}",
                raw.status_code, raw.status_description
            );
            TransportOutcome::ProtocolError { response: raw, message }
        } else {
            TransportOutcome::Response(raw)
        }
    }
}

fn into_raw(response: Response<Body>) -> RawResponse {
    let status = response.status();
    let response_uri = response.get_uri().to_string();
    let headers = response
        .headers()
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    RawResponse {
        status_code: status.as_u16(),
        status_description: status_description(status),
        headers,
        response_uri: Some(response_uri),
        body: Box::new(response.into_body().into_reader()),
    }
}

fn status_description(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_u16().to_string(),
    }
}
