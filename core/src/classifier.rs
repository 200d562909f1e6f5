//! Reduce a `TransportOutcome` to an `HttpResponse`.
//!
//! Status codes are data, not failures: any outcome that carries a response
//! is classified `Success` and the caller inspects `status_code`. Only a
//! call that produced no readable response is `Error`, and then every field
//! but `error_message` keeps its default.

use std::io::Read;

use log::{debug, warn};

use crate::error::TransportError;
use crate::http::{HttpResponse, ResponseStatus};
use crate::transport::{RawResponse, TransportOutcome};

pub fn classify(outcome: TransportOutcome) -> HttpResponse {
    let raw = match outcome {
        TransportOutcome::Response(raw) => raw,
        TransportOutcome::ProtocolError { response, message } => {
            debug!("transport flagged {}: {message}", response.status_code);
            response
        }
        TransportOutcome::Failed(err) => return failed(err),
    };

    match read_response(raw) {
        Ok(response) => response,
        Err(err) => failed(err),
    }
}

fn failed(err: TransportError) -> HttpResponse {
    warn!("request failed: {err}");
    HttpResponse {
        status: ResponseStatus::Error,
        error_message: Some(err.to_string()),
        ..HttpResponse::default()
    }
}

fn read_response(mut raw: RawResponse) -> Result<HttpResponse, TransportError> {
    let mut bytes = Vec::new();
    raw.body
        .read_to_end(&mut bytes)
        .map_err(|e| TransportError::BodyRead(e.to_string()))?;

    let header = |name: &str| raw.header(name).map(str::to_string);
    let response = HttpResponse {
        status: ResponseStatus::Success,
        status_code: raw.status_code,
        status_description: raw.status_description.clone(),
        content_type: header("content-type"),
        content_length: raw.header("content-length").and_then(|v| v.trim().parse().ok()),
        content_encoding: header("content-encoding"),
        content: String::from_utf8_lossy(&bytes).into_owned(),
        response_uri: raw.response_uri.clone(),
        server: header("server"),
        headers: raw.headers.clone(),
        error_message: None,
    };
    debug!(
        "classified {} {} ({} bytes)",
        response.status_code,
        response.status_description,
        bytes.len()
    );
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    struct BrokenBody;

    impl Read for BrokenBody {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset mid-body"))
        }
    }

    #[test]
    fn ok_response_copies_metadata() {
        let raw = RawResponse::from_bytes(200, "OK", "hello")
            .with_header("Content-Type", "text/plain")
            .with_header("Content-Length", "5")
            .with_header("Content-Encoding", "identity")
            .with_header("Server", "unit")
            .with_response_uri("http://x/final");
        let r = classify(TransportOutcome::Response(raw));

        assert_eq!(r.status, ResponseStatus::Success);
        assert_eq!(r.status_code, 200);
        assert_eq!(r.status_description, "OK");
        assert_eq!(r.content, "hello");
        assert_eq!(r.content_type.as_deref(), Some("text/plain"));
        assert_eq!(r.content_length, Some(5));
        assert_eq!(r.content_encoding.as_deref(), Some("identity"));
        assert_eq!(r.server.as_deref(), Some("unit"));
        assert_eq!(r.response_uri.as_deref(), Some("http://x/final"));
        assert_eq!(r.header("server"), Some("unit"));
        assert!(r.error_message.is_none());
    }

    #[test]
    fn protocol_error_is_still_success() {
        let raw = RawResponse::from_bytes(404, "Not Found", "no such thing");
        let r = classify(TransportOutcome::ProtocolError {
            response: raw,
            message: "404 Not Found".to_string(),
        });

        assert_eq!(r.status, ResponseStatus::Success);
        assert_eq!(r.status_code, 404);
        assert_eq!(r.content, "no such thing");
        assert!(r.error_message.is_none());
    }

    #[test]
    fn transport_failure_leaves_defaults() {
        let r = classify(TransportOutcome::Failed(TransportError::Failure(
            "dns error: failed to lookup address".to_string(),
        )));

        assert_eq!(r.status, ResponseStatus::Error);
        assert_eq!(r.error_message.as_deref(), Some("dns error: failed to lookup address"));
        assert_eq!(r.status_code, 0);
        assert!(r.content.is_empty());
        assert!(r.content_type.is_none());
        assert!(r.response_uri.is_none());
    }

    #[test]
    fn unreadable_body_is_error() {
        let mut raw = RawResponse::from_bytes(200, "OK", "").with_header("Server", "unit");
        raw.body = Box::new(BrokenBody);
        let r = classify(TransportOutcome::Response(raw));

        assert_eq!(r.status, ResponseStatus::Error);
        assert!(r.error_message.unwrap().contains("connection reset mid-body"));
        assert_eq!(r.status_code, 0);
        assert!(r.server.is_none());
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let raw = RawResponse::from_bytes(200, "OK", vec![b'a', 0xff, b'b']);
        let r = classify(TransportOutcome::Response(raw));
        assert_eq!(r.content, "a\u{fffd}b");
    }

    #[test]
    fn malformed_content_length_is_dropped() {
        let raw = RawResponse::from_bytes(200, "OK", "x").with_header("content-length", "many");
        let r = classify(TransportOutcome::Response(raw));
        assert_eq!(r.status, ResponseStatus::Success);
        assert!(r.content_length.is_none());
    }
}
