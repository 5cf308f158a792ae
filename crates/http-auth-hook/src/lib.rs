// crates/http-auth-hook/src/lib.rs
// ============================================================================
// Module: HTTP Auth Hook Library
// Description: Broker auth hook that delegates decisions to an HTTP service.
// Purpose: Map connect and topic-access events to HTTP calls and verdicts.
// Dependencies: reqwest, serde, serde_json, thiserror, url
// ============================================================================

//! ## Overview
//! HTTP Auth Hook is a protocol adapter between an MQTT broker and an external
//! authorization service. [`HttpAuthHook`] implements [`BrokerHook`]: on
//! connect it POSTs the client's credentials, on publish/subscribe it POSTs
//! the topic and access kind, and it maps the response to allow/deny.
//! Invariants:
//! - Decisions fail closed: transport and send errors deny.
//! - A 2xx response allows unless a custom [`Decider`] says otherwise.
//! - The transport is pluggable; tests never need a live network.
//!
//! Security posture: the external service is the only source of policy; this
//! crate caches nothing and retries nothing.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod broker;
pub mod config;
pub mod decision;
pub mod hook;
pub mod request;
pub mod transport;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuthAuditEvent;
pub use audit::AuthAuditSink;
pub use audit::InitAuditEvent;
pub use audit::LogAuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use broker::BrokerHook;
pub use broker::Client;
pub use broker::ClientProperties;
pub use broker::ConnectPacket;
pub use broker::HookEvent;
pub use config::HookError;
pub use config::HttpAuthOptions;
pub use decision::CallbackDecider;
pub use decision::Decider;
pub use decision::StatusDecider;
pub use hook::HOOK_ID;
pub use hook::HttpAuthHook;
pub use request::AccessKind;
pub use request::AccessRequest;
pub use request::AclCheckBody;
pub use request::ClientCheckBody;
pub use request::RequestSender;
pub use request::SendError;
pub use reqwest::Method;
pub use transport::CallbackTransport;
pub use transport::HttpClient;
pub use transport::HttpRequest;
pub use transport::HttpResponse;
pub use transport::MAX_RESPONSE_BYTES;
pub use transport::ReqwestTransport;
pub use transport::Transport;
pub use transport::TransportError;
pub use url::Url;
