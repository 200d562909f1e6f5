//! Header dispatch.
//!
//! # Design
//! Most headers go straight into a generic collection. A fixed set of
//! "restricted" names is instead routed to a typed field, because the
//! transport computes them itself or validates them specially. The routing
//! is a data table from name to `HeaderEffect`, so the table can be tested
//! without building a request.

use chrono::NaiveDateTime;

use crate::dates::{format_http_date, parse_http_date};
use crate::error::HttpError;
use crate::http::HttpHeader;

/// Typed field a restricted header writes to verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectField {
    Accept,
    Connection,
    ContentType,
    Expect,
    Referer,
    UserAgent,
}

/// What applying a restricted header does to the outgoing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderEffect {
    /// Set by the transport; the caller's value is dropped.
    Ignore,
    /// Not implemented; applying it fails.
    Unsupported,
    SetContentLength,
    SetConditional,
    /// Store the transfer encoding and switch on chunked sending.
    SetTransferEncodingChunked,
    SetDirect(DirectField),
}

const RESTRICTED_HEADERS: &[(&str, HeaderEffect)] = &[
    ("Accept", HeaderEffect::SetDirect(DirectField::Accept)),
    ("Connection", HeaderEffect::SetDirect(DirectField::Connection)),
    ("Content-Length", HeaderEffect::SetContentLength),
    ("Content-Type", HeaderEffect::SetDirect(DirectField::ContentType)),
    ("Expect", HeaderEffect::SetDirect(DirectField::Expect)),
    ("Date", HeaderEffect::Ignore),
    ("Host", HeaderEffect::Ignore),
    ("If-Modified-Since", HeaderEffect::SetConditional),
    ("Range", HeaderEffect::Unsupported),
    ("Referer", HeaderEffect::SetDirect(DirectField::Referer)),
    ("Transfer-Encoding", HeaderEffect::SetTransferEncodingChunked),
    ("User-Agent", HeaderEffect::SetDirect(DirectField::UserAgent)),
];

/// Effect for a restricted header name, matched case-insensitively.
/// `None` means the header belongs in the generic collection.
pub fn effect_for(name: &str) -> Option<HeaderEffect> {
    RESTRICTED_HEADERS
        .iter()
        .find(|(restricted, _)| restricted.eq_ignore_ascii_case(name))
        .map(|(_, effect)| *effect)
}

/// Header state of a request about to be sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingHeaders {
    pub accept: Option<String>,
    pub connection: Option<String>,
    pub content_length: Option<u64>,
    pub content_type: Option<String>,
    pub expect: Option<String>,
    pub if_modified_since: Option<NaiveDateTime>,
    pub referer: Option<String>,
    pub transfer_encoding: Option<String>,
    pub send_chunked: bool,
    pub user_agent: Option<String>,
    generic: Vec<(String, String)>,
}

impl OutgoingHeaders {
    /// Write into the generic collection. An existing entry with the same
    /// name (ignoring case) is replaced in place.
    pub fn set(&mut self, name: &str, value: &str) {
        match self.generic.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.generic.push((name.to_string(), value.to_string())),
        }
    }

    /// Look up a generic header. Typed fields are not consulted.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.generic
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn generic(&self) -> &[(String, String)] {
        &self.generic
    }

    /// Route one header to its typed field or the generic collection.
    pub fn apply(&mut self, header: &HttpHeader) -> Result<(), HttpError> {
        let Some(effect) = effect_for(&header.name) else {
            self.set(&header.name, &header.value);
            return Ok(());
        };

        match effect {
            HeaderEffect::Ignore => {}
            HeaderEffect::Unsupported => {
                return Err(HttpError::UnsupportedHeader(header.name.clone()));
            }
            HeaderEffect::SetContentLength => {
                let length = header.value.trim().parse::<u64>().map_err(|e| invalid(header, e.to_string()))?;
                self.content_length = Some(length);
            }
            HeaderEffect::SetConditional => {
                let since = parse_http_date(&header.value)
                    .ok_or_else(|| invalid(header, "not a recognised date".to_string()))?;
                self.if_modified_since = Some(since);
            }
            HeaderEffect::SetTransferEncodingChunked => {
                self.transfer_encoding = Some(header.value.clone());
                self.send_chunked = true;
            }
            HeaderEffect::SetDirect(field) => {
                let value = Some(header.value.clone());
                match field {
                    DirectField::Accept => self.accept = value,
                    DirectField::Connection => self.connection = value,
                    DirectField::ContentType => self.content_type = value,
                    DirectField::Expect => self.expect = value,
                    DirectField::Referer => self.referer = value,
                    DirectField::UserAgent => self.user_agent = value,
                }
            }
        }
        Ok(())
    }

    /// Every header the request will carry: typed fields first, then the
    /// generic collection in insertion order.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        let mut push = |name: &str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((name.to_string(), value));
            }
        };
        push("Accept", self.accept.clone());
        push("Connection", self.connection.clone());
        push("Content-Length", self.content_length.map(|l| l.to_string()));
        push("Content-Type", self.content_type.clone());
        push("Expect", self.expect.clone());
        push("If-Modified-Since", self.if_modified_since.as_ref().map(format_http_date));
        push("Referer", self.referer.clone());
        let transfer_encoding = match (&self.transfer_encoding, self.send_chunked) {
            (Some(te), _) => Some(te.clone()),
            (None, true) => Some("chunked".to_string()),
            (None, false) => None,
        };
        push("Transfer-Encoding", transfer_encoding);
        push("User-Agent", self.user_agent.clone());
        pairs.extend(self.generic.iter().cloned());
        pairs
    }
}

/// Apply headers in order. Stops at the first header that cannot be applied.
pub fn apply_headers(target: &mut OutgoingHeaders, headers: &[HttpHeader]) -> Result<(), HttpError> {
    for header in headers {
        target.apply(header)?;
    }
    Ok(())
}

fn invalid(header: &HttpHeader, reason: String) -> HttpError {
    HttpError::InvalidHeaderValue {
        name: header.name.clone(),
        value: header.value.clone(),
        reason,
    }
}
