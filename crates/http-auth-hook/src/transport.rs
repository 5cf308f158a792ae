// crates/http-auth-hook/src/transport.rs
// ============================================================================
// Module: HTTP Auth Hook Transport
// Description: Pluggable single-exchange HTTP transport and client wrapper.
// Purpose: Send one request and return one response regardless of backend.
// Dependencies: reqwest, thiserror, url
// ============================================================================

//! ## Overview
//! [`Transport`] is the seam between the hook and the network: it sends one
//! [`HttpRequest`] and returns one [`HttpResponse`] or a [`TransportError`].
//! [`HttpClient`] wraps whichever transport was configured and falls back to
//! [`ReqwestTransport`] when none was supplied.
//! Invariants:
//! - The wrapper forwards requests unmodified; it adds no headers, retries, or
//!   timeouts of its own.
//! - The default transport has no request timeout.
//! - Response bodies are capped at [`MAX_RESPONSE_BYTES`]; a longer or
//!   interrupted body is kept truncated and flagged, never turned into an
//!   error once the status line has arrived.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum response body size read by [`ReqwestTransport`].
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Exchange Types
// ============================================================================

/// Outbound HTTP request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Request method.
    pub method: Method,
    /// Absolute target URL.
    pub url: Url,
    /// Header name/value pairs in insertion order.
    pub headers: Vec<(String, String)>,
    /// Request body; `None` sends an empty body.
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Returns the first header value matching `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// HTTP response returned by a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Header name/value pairs in receive order.
    pub headers: Vec<(String, String)>,
    /// Response body bytes, at most [`MAX_RESPONSE_BYTES`] from the default
    /// transport.
    pub body: Vec<u8>,
    /// True when the body was cut short by the size cap or a read failure.
    pub truncated: bool,
}

impl HttpResponse {
    /// Builds a response with the given status and no headers or body.
    #[must_use]
    pub const fn with_status(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
            truncated: false,
        }
    }

    /// Returns the first header value matching `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

// ============================================================================
// SECTION: Transport Errors
// ============================================================================

/// Errors emitted by transports.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Raised only when no response was obtained; body problems after the
///   status line surface as [`HttpResponse::truncated`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The HTTP client could not be constructed.
    #[error("http client build failed: {0}")]
    Client(String),
    /// Connection could not be established (refused, DNS failure, TLS).
    #[error("connection failed: {0}")]
    Connect(String),
    /// The transport gave up waiting for a response.
    #[error("request timed out: {0}")]
    Timeout(String),
    /// The request could not be built or sent.
    #[error("request failed: {0}")]
    Request(String),
}

// ============================================================================
// SECTION: Transport Trait
// ============================================================================

/// Sends one HTTP request and returns one response.
pub trait Transport: Send + Sync {
    /// Performs a single request/response exchange.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] when no response could be obtained.
    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ============================================================================
// SECTION: Reqwest Transport
// ============================================================================

/// Default transport backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    /// Blocking client used for every exchange.
    client: Client,
}

impl ReqwestTransport {
    /// Builds a transport with no request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the client cannot be built.
    pub fn new() -> Result<Self, TransportError> {
        build_client(None).map(Self::with_client)
    }

    /// Builds a transport that bounds each exchange by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the client cannot be built.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        build_client(Some(timeout)).map(Self::with_client)
    }

    /// Wraps a preconfigured blocking client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
        }
    }
}

impl Transport for ReqwestTransport {
    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.request(request.method.clone(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }
        let built = builder.build().map_err(|err| TransportError::Request(err.to_string()))?;
        let mut response = self.client.execute(built).map_err(classify_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let (body, truncated) = read_body_capped(&mut response, MAX_RESPONSE_BYTES);
        Ok(HttpResponse {
            status,
            headers,
            body,
            truncated,
        })
    }
}

// ============================================================================
// SECTION: Callback Transport
// ============================================================================

/// Callback handler signature used by [`CallbackTransport`].
type RoundTripHandler = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Transport that answers requests with a user-supplied function.
#[derive(Clone)]
pub struct CallbackTransport {
    /// Handler invoked for every request.
    handler: Arc<RoundTripHandler>,
}

impl CallbackTransport {
    /// Creates a callback transport from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for CallbackTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackTransport").finish_non_exhaustive()
    }
}

impl Transport for CallbackTransport {
    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (self.handler)(request)
    }
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Uniform send capability over the configured transport.
#[derive(Clone)]
pub struct HttpClient {
    /// Transport every request is forwarded to.
    transport: Arc<dyn Transport>,
}

impl HttpClient {
    /// Wraps `transport`, installing [`ReqwestTransport`] when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] when the default transport cannot
    /// be built.
    pub fn new(transport: Option<Arc<dyn Transport>>) -> Result<Self, TransportError> {
        let transport = match transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        Ok(Self {
            transport,
        })
    }

    /// Sends the request through the wrapped transport unchanged.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`TransportError`] unchanged.
    pub fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.transport.round_trip(request)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient").finish_non_exhaustive()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a blocking client; `None` disables reqwest's default timeout.
fn build_client(timeout: Option<Duration>) -> Result<Client, TransportError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|err| TransportError::Client(err.to_string()))
}

/// Maps a reqwest send error onto the transport taxonomy.
fn classify_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Reads at most `max_bytes` of the body.
///
/// Returns the bytes read and whether the body was cut short. A read failure
/// after the headers keeps whatever arrived.
fn read_body_capped(
    response: &mut reqwest::blocking::Response,
    max_bytes: usize,
) -> (Vec<u8>, bool) {
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let mut buf = Vec::new();
    let read_failed = response.take(limit).read_to_end(&mut buf).is_err();
    let oversized = buf.len() > max_bytes;
    buf.truncate(max_bytes);
    (buf, read_failed || oversized)
}

/// Case-insensitive header lookup over name/value pairs.
fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}
