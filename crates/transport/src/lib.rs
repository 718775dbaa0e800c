//! Authenticated HTTP transport for the Up2Share API.
//!
//! [`ApiClient`] attaches credentials and a per-request timeout to every call
//! and never raises on transport failures: a request that could not complete
//! resolves to `None`. HTTP status codes (including 3xx and 4xx) are always
//! delivered to the caller as a [`Response`].

mod client;
mod config;
mod request;

pub use client::{ApiClient, Transport, TransportFuture, resolve_url};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
pub use request::{Request, Response};

pub use reqwest::Method;
pub use reqwest::header;

/// Errors produced while building a client.
///
/// Request-time failures are not errors; see [`Transport::request`].
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid {0}")]
    InvalidCredential(&'static str),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
