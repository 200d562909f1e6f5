//! Client configuration.
//!
//! The multipart boundary is injected here rather than held as a global so
//! tests can pin a fixed token while production code may opt into a fresh
//! token per request.

use std::time::Duration;

use serde::Deserialize;
use uuid::Uuid;

/// Boundary used when no other is configured.
pub const DEFAULT_BOUNDARY: &str = "-----------------------------28947758029299";

/// Where multipart boundaries come from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Boundary {
    /// Same token for every request; encoding is byte-for-byte repeatable.
    Fixed(String),
    /// A fresh random token for every request.
    Random,
}

impl Default for Boundary {
    fn default() -> Self {
        Boundary::Fixed(DEFAULT_BOUNDARY.to_string())
    }
}

impl Boundary {
    /// Token for the next multipart body.
    pub fn token(&self) -> String {
        match self {
            Boundary::Fixed(token) => token.clone(),
            Boundary::Random => format!("----------------restwire{}", Uuid::new_v4().simple()),
        }
    }
}

/// Settings shared by every call made through a `RestClient` and its
/// transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub boundary: Boundary,
    /// Overall per-call timeout handed to the transport. `None` leaves the
    /// transport's own default in place.
    pub timeout_secs: Option<u64>,
}

impl ClientConfig {
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
