// crates/http-auth-hook/tests/hook_http.rs
// ============================================================================
// Module: HTTP Auth Hook End-to-End Tests
// Description: Hook decisions against a live local authorization service.
// Purpose: Confirm the default transport path from broker callback to verdict.
// Dependencies: http-auth-hook, serde_json, tiny_http
// ============================================================================

//! ## Overview
//! Drives [`HttpAuthHook`] through its default reqwest transport and checks
//! what the service receives and how its answer maps to allow/deny.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use std::sync::Arc;
use std::sync::Mutex;

use http_auth_hook::BrokerHook;
use http_auth_hook::Client;
use http_auth_hook::ConnectPacket;
use http_auth_hook::HttpAuthHook;
use http_auth_hook::HttpAuthOptions;
use http_auth_hook::LogAuditSink;
use http_auth_hook::MAX_RESPONSE_BYTES;
use http_auth_hook::NoopAuditSink;
use http_auth_hook::Url;
use serde_json::Value;
use serde_json::json;

use crate::common::closed_port_url;
use crate::common::serve_once;

/// Builds a hook pointed at the fixture server.
fn hook_for(base: &str) -> HttpAuthHook {
    let options = HttpAuthOptions::new(
        Url::parse(&format!("{base}/acl")).unwrap(),
        Url::parse(&format!("{base}/auth")).unwrap(),
    )
    .with_audit_sink(NoopAuditSink);
    HttpAuthHook::from_options(&options).unwrap()
}

#[test]
fn connect_is_allowed_by_2xx_service() {
    let (base, handle) = serve_once(200, Vec::new());
    let hook = hook_for(&base);
    assert!(hook.on_connect_authenticate(
        &Client::new("client-1", ""),
        &ConnectPacket::new("alice", "secret")
    ));

    let captured = handle.join().unwrap();
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/auth");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(body, json!({"clientid": "client-1", "password": "secret", "username": "alice"}));
}

#[test]
fn acl_is_denied_by_403_service() {
    let (base, handle) = serve_once(403, b"forbidden".to_vec());
    let hook = hook_for(&base);
    assert!(!hook.on_acl_check(&Client::new("client-2", "bob"), "plant/valve", true));

    let captured = handle.join().unwrap();
    assert_eq!(captured.path, "/acl");
    let body: Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(
        body,
        json!({"username": "bob", "clientid": "client-2", "topic": "plant/valve", "acc": "true"})
    );
}

#[test]
fn oversized_2xx_body_still_allows() {
    let (base, handle) = serve_once(200, vec![b'x'; MAX_RESPONSE_BYTES + 1]);
    let hook = hook_for(&base);
    let allowed =
        hook.on_connect_authenticate(&Client::new("client-3", ""), &ConnectPacket::new("u", "p"));
    drop(hook);
    assert!(allowed);
    let _ = handle.join();
}

#[test]
fn redirect_status_is_denied() {
    let (base, handle) = serve_once(304, Vec::new());
    let hook = hook_for(&base);
    assert!(!hook.on_acl_check(&Client::new("c", "u"), "t", false));
    handle.join().unwrap();
}

#[test]
fn unreachable_service_denies_and_audits_reason() {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let base = closed_port_url();
    let options = HttpAuthOptions::new(
        Url::parse(&format!("{base}/acl")).unwrap(),
        Url::parse(&format!("{base}/auth")).unwrap(),
    )
    .with_audit_sink(LogAuditSink::new(SharedBuffer(Arc::clone(&buffer))));
    let hook = HttpAuthHook::from_options(&options).unwrap();

    assert!(!hook.on_connect_authenticate(&Client::new("c", ""), &ConnectPacket::new("u", "pw")));

    let written = buffer.lock().unwrap().clone();
    let text = String::from_utf8(written).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    let init: Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(init["event"], "http_auth_init");
    assert_eq!(init["custom_decider"], false);
    let event: Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(event["event"], "http_auth_check");
    assert_eq!(event["check"], "connect");
    assert_eq!(event["decision"], "deny");
    assert!(event.get("status").is_none());
    assert!(event["reason"].as_str().unwrap().contains("transport failure"));
}

/// Writer appending into a shared buffer.
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
