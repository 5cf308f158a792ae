// crates/http-auth-hook/src/audit.rs
// ============================================================================
// Module: HTTP Auth Hook Audit Logging
// Description: Structured audit events for connect and ACL decisions.
// Purpose: Record every decision, and the cause of every failure, as JSON.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Each broker callback yields exactly one [`AuthAuditEvent`], recorded by the
//! configured [`AuthAuditSink`]. Each successful init yields one
//! [`InitAuditEvent`] noting which collaborators replaced the defaults.
//! Deployments route events by choosing a sink. Passwords are never part of
//! an event.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::sync::Mutex;

use serde::Serialize;

use crate::request::AccessRequest;

// ============================================================================
// SECTION: Audit Events
// ============================================================================

/// Audit event emitted for every connect or ACL decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Check kind (`connect` or `acl`).
    pub check: &'static str,
    /// Decision outcome (`allow` or `deny`).
    pub decision: &'static str,
    /// Client identifier.
    pub client_id: String,
    /// Username presented or bound to the session.
    pub username: String,
    /// Topic for ACL checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Access label for ACL checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access: Option<&'static str>,
    /// Response status when an exchange completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Failure reason for denials not produced by the decider.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthAuditEvent {
    /// Event identifier shared by every record.
    pub const EVENT: &'static str = "http_auth_check";

    /// Builds an event for a decider outcome.
    #[must_use]
    pub fn decided(request: &AccessRequest, allowed: bool, status: u16) -> Self {
        let mut event = Self::base(request, allowed);
        event.status = Some(status);
        event
    }

    /// Builds a deny event for a failure that bypassed the decider.
    #[must_use]
    pub fn failed(request: &AccessRequest, reason: impl Into<String>) -> Self {
        let mut event = Self::base(request, false);
        event.reason = Some(reason.into());
        event
    }

    /// Fills the request-derived fields.
    fn base(request: &AccessRequest, allowed: bool) -> Self {
        let (check, topic, access) = match request {
            AccessRequest::Connect(_) => ("connect", None, None),
            AccessRequest::Topic(check) => {
                ("acl", Some(check.topic.clone()), Some(check.access.label()))
            }
        };
        Self {
            event: Self::EVENT,
            check,
            decision: if allowed { "allow" } else { "deny" },
            client_id: request.client_id().to_string(),
            username: request.username().to_string(),
            topic,
            access,
            status: None,
            reason: None,
        }
    }
}

/// Audit event emitted once per successful hook init.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InitAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Identifier of the initialized hook.
    pub hook_id: &'static str,
    /// Configured ACL endpoint.
    pub acl_host: String,
    /// Configured client authentication endpoint.
    pub client_auth_host: String,
    /// True when a caller-supplied transport replaced the default.
    pub custom_transport: bool,
    /// True when a caller-supplied decider replaced the 2xx status policy.
    pub custom_decider: bool,
}

impl InitAuditEvent {
    /// Event identifier shared by every init record.
    pub const EVENT: &'static str = "http_auth_init";
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for auth decisions.
pub trait AuthAuditSink: Send + Sync {
    /// Record an auth audit event.
    fn record(&self, event: &AuthAuditEvent);

    /// Record a hook init event. Ignored unless the sink overrides it.
    fn record_init(&self, _event: &InitAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl AuthAuditSink for StderrAuditSink {
    fn record(&self, event: &AuthAuditEvent) {
        write_json_line(&mut std::io::stderr().lock(), event);
    }

    fn record_init(&self, event: &InitAuditEvent) {
        write_json_line(&mut std::io::stderr().lock(), event);
    }
}

/// Audit sink that writes JSON lines to an arbitrary writer.
pub struct LogAuditSink<W: Write + Send> {
    /// Output writer for audit records.
    writer: Mutex<W>,
}

impl<W: Write + Send> LogAuditSink<W> {
    /// Creates a sink over `writer`.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> LogAuditSink<W> {
    /// Writes one record under the writer lock.
    fn write_record<T: Serialize>(&self, record: &T) {
        if let Ok(mut guard) = self.writer.lock() {
            write_json_line(&mut *guard, record);
        }
    }
}

impl<W: Write + Send> AuthAuditSink for LogAuditSink<W> {
    fn record(&self, event: &AuthAuditEvent) {
        self.write_record(event);
    }

    fn record_init(&self, event: &InitAuditEvent) {
        self.write_record(event);
    }
}

/// No-op audit sink for tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuthAuditSink for NoopAuditSink {
    fn record(&self, _event: &AuthAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Serializes `record` as one JSON line; write failures are dropped.
fn write_json_line<W: Write + ?Sized, T: Serialize>(writer: &mut W, record: &T) {
    if serde_json::to_writer(&mut *writer, record).is_ok() {
        let _ = writer.write_all(b"\n");
    }
}
