// crates/http-auth-hook/src/request.rs
// ============================================================================
// Module: HTTP Auth Hook Requests
// Description: Access request variants, wire bodies, and the request sender.
// Purpose: Turn connect and topic-access events into outbound HTTP calls.
// Dependencies: reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! An [`AccessRequest`] is built once per broker callback and serialized into
//! one of two fixed JSON bodies ([`ClientCheckBody`], [`AclCheckBody`]).
//! [`RequestSender`] POSTs the body to the matching endpoint and returns the
//! raw response or a [`SendError`].
//! Invariants:
//! - Field values are copied verbatim from the triggering event.
//! - The sender never retries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use reqwest::Method;
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::transport::HttpClient;
use crate::transport::HttpRequest;
use crate::transport::HttpResponse;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type attached to JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Access Requests
// ============================================================================

/// Kind of topic access being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessKind {
    /// Subscribe / receive.
    Read,
    /// Publish.
    Write,
}

impl AccessKind {
    /// Maps the broker's write flag onto an access kind.
    #[must_use]
    pub const fn from_write_flag(write: bool) -> Self {
        if write { Self::Write } else { Self::Read }
    }

    /// Returns the `acc` wire literal (`"true"` for write).
    #[must_use]
    pub const fn as_acc(self) -> &'static str {
        match self {
            Self::Read => "false",
            Self::Write => "true",
        }
    }

    /// Returns a stable label for audit records.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

/// Connect-time credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectCheck {
    /// Client identifier presented on connect.
    pub client_id: String,
    /// Username from the connect packet.
    pub username: String,
    /// Password from the connect packet.
    pub password: String,
}

/// Topic access check for an established client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicCheck {
    /// Client identifier.
    pub client_id: String,
    /// Username bound to the client session.
    pub username: String,
    /// Topic being published or subscribed to.
    pub topic: String,
    /// Requested access.
    pub access: AccessKind,
}

/// Per-call access request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequest {
    /// Credential check on connect.
    Connect(ConnectCheck),
    /// Publish/subscribe check on a topic.
    Topic(TopicCheck),
}

impl AccessRequest {
    /// Returns the client identifier carried by either variant.
    #[must_use]
    pub fn client_id(&self) -> &str {
        match self {
            Self::Connect(check) => &check.client_id,
            Self::Topic(check) => &check.client_id,
        }
    }

    /// Returns the username carried by either variant.
    #[must_use]
    pub fn username(&self) -> &str {
        match self {
            Self::Connect(check) => &check.username,
            Self::Topic(check) => &check.username,
        }
    }
}

// ============================================================================
// SECTION: Wire Bodies
// ============================================================================

/// Body POSTed to the client authentication endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientCheckBody<'a> {
    /// Client identifier.
    #[serde(rename = "clientid")]
    pub client_id: &'a str,
    /// Connect password.
    pub password: &'a str,
    /// Connect username.
    pub username: &'a str,
}

/// Body POSTed to the ACL endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AclCheckBody<'a> {
    /// Session username.
    pub username: &'a str,
    /// Client identifier.
    #[serde(rename = "clientid")]
    pub client_id: &'a str,
    /// Topic name.
    pub topic: &'a str,
    /// `"true"` for write, `"false"` for read.
    pub acc: &'static str,
}

impl<'a> From<&'a ConnectCheck> for ClientCheckBody<'a> {
    fn from(check: &'a ConnectCheck) -> Self {
        Self {
            client_id: &check.client_id,
            password: &check.password,
            username: &check.username,
        }
    }
}

impl<'a> From<&'a TopicCheck> for AclCheckBody<'a> {
    fn from(check: &'a TopicCheck) -> Self {
        Self {
            username: &check.username,
            client_id: &check.client_id,
            topic: &check.topic,
            acc: check.access.as_acc(),
        }
    }
}

// ============================================================================
// SECTION: Send Errors
// ============================================================================

/// Errors returned by [`RequestSender`].
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum SendError {
    /// The payload could not be serialized to JSON.
    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The outbound request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The transport failed to deliver the request.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),
}

// ============================================================================
// SECTION: Request Sender
// ============================================================================

/// Serializes payloads and issues them through an [`HttpClient`].
#[derive(Debug, Clone)]
pub struct RequestSender {
    /// Client used for every exchange.
    client: HttpClient,
}

impl RequestSender {
    /// Creates a sender over the provided client.
    #[must_use]
    pub const fn new(client: HttpClient) -> Self {
        Self {
            client,
        }
    }

    /// Sends an access request to the endpoint matching its variant.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when serialization, construction, or transport
    /// fails.
    pub fn send_access(
        &self,
        request: &AccessRequest,
        client_auth_host: &Url,
        acl_host: &Url,
    ) -> Result<HttpResponse, SendError> {
        match request {
            AccessRequest::Connect(check) => {
                self.send(Method::POST, client_auth_host, Some(&ClientCheckBody::from(check)))
            }
            AccessRequest::Topic(check) => {
                self.send(Method::POST, acl_host, Some(&AclCheckBody::from(check)))
            }
        }
    }

    /// Sends `payload` as JSON (or an empty body when `None`) to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SendError`] when serialization, construction, or transport
    /// fails.
    pub fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &Url,
        payload: Option<&T>,
    ) -> Result<HttpResponse, SendError> {
        let request = build_request(method, url, payload)?;
        Ok(self.client.send(&request)?)
    }
}

/// Builds the outbound request for `payload`.
///
/// # Errors
///
/// Returns [`SendError`] when the URL is not HTTP(S) or serialization fails.
pub fn build_request<T: Serialize + ?Sized>(
    method: Method,
    url: &Url,
    payload: Option<&T>,
) -> Result<HttpRequest, SendError> {
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(SendError::InvalidRequest(format!("unsupported url scheme: {scheme}")));
        }
    }
    let (headers, body) = match payload {
        Some(payload) => {
            let bytes = serde_json::to_vec(payload)?;
            (vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())], Some(bytes))
        }
        None => (Vec::new(), None),
    };
    Ok(HttpRequest {
        method,
        url: url.clone(),
        headers,
        body,
    })
}
