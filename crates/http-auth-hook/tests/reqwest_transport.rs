// crates/http-auth-hook/tests/reqwest_transport.rs
// ============================================================================
// Module: Reqwest Transport Tests
// Description: Default transport behavior against a local HTTP server.
// Purpose: Verify status pass-through, body caps, and error classification.
// Dependencies: http-auth-hook, tiny_http
// ============================================================================

//! ## Overview
//! Exercises [`ReqwestTransport`] and [`RequestSender`] over real sockets.

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

use std::time::Duration;

use http_auth_hook::HttpClient;
use http_auth_hook::HttpRequest;
use http_auth_hook::MAX_RESPONSE_BYTES;
use http_auth_hook::Method;
use http_auth_hook::RequestSender;
use http_auth_hook::ReqwestTransport;
use http_auth_hook::SendError;
use http_auth_hook::Transport;
use http_auth_hook::TransportError;
use http_auth_hook::Url;
use serde_json::json;

use crate::common::closed_port_url;
use crate::common::serve_once;
use crate::common::serve_once_with_header;

/// Builds a bodiless GET request.
fn get(url: &str) -> HttpRequest {
    HttpRequest {
        method: Method::GET,
        url: Url::parse(url).unwrap(),
        headers: Vec::new(),
        body: None,
    }
}

#[test]
fn status_body_and_headers_pass_through() {
    let (base, handle) =
        serve_once_with_header(418, b"teapot".to_vec(), Some(("X-Policy", "strict")));
    let transport = ReqwestTransport::new().unwrap();
    let response = transport.round_trip(&get(&format!("{base}/check"))).unwrap();
    assert_eq!(response.status, 418);
    assert_eq!(response.body, b"teapot");
    assert_eq!(response.header("x-policy"), Some("strict"));
    assert!(!response.truncated);
    let captured = handle.join().unwrap();
    assert_eq!(captured.method, "GET");
    assert_eq!(captured.path, "/check");
}

#[test]
fn non_success_status_is_not_an_error() {
    let (base, handle) = serve_once(503, Vec::new());
    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5)).unwrap();
    let response = transport.round_trip(&get(&base)).unwrap();
    assert_eq!(response.status, 503);
    handle.join().unwrap();
}

#[test]
fn connection_refused_is_classified() {
    let transport = ReqwestTransport::new().unwrap();
    let err = transport.round_trip(&get(&closed_port_url())).unwrap_err();
    assert!(matches!(err, TransportError::Connect(_)), "{err:?}");
}

#[test]
fn oversized_body_is_truncated_not_failed() {
    let (base, handle) = serve_once(200, vec![b'a'; MAX_RESPONSE_BYTES + 1]);
    let transport = ReqwestTransport::new().unwrap();
    let response = transport.round_trip(&get(&base)).unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body.len(), MAX_RESPONSE_BYTES);
    assert!(response.truncated);
    let _ = handle.join();
}

#[test]
fn sender_posts_json_with_content_type() {
    let (base, handle) = serve_once(200, Vec::new());
    let sender = RequestSender::new(HttpClient::new(None).unwrap());
    let url = Url::parse(&format!("{base}/auth")).unwrap();
    let response = sender.send(Method::POST, &url, Some(&json!({"username": "alice"}))).unwrap();
    assert_eq!(response.status, 200);

    let captured = handle.join().unwrap();
    assert_eq!(captured.method, "POST");
    assert_eq!(captured.path, "/auth");
    assert_eq!(captured.content_type.as_deref(), Some("application/json"));
    let body: serde_json::Value = serde_json::from_slice(&captured.body).unwrap();
    assert_eq!(body, json!({"username": "alice"}));
}

#[test]
fn sender_without_payload_sends_no_body() {
    let (base, handle) = serve_once(204, Vec::new());
    let sender = RequestSender::new(HttpClient::new(None).unwrap());
    let url = Url::parse(&base).unwrap();
    let response = sender.send::<serde_json::Value>(Method::GET, &url, None).unwrap();
    assert_eq!(response.status, 204);

    let captured = handle.join().unwrap();
    assert!(captured.content_type.is_none());
    assert!(captured.body.is_empty());
}

#[test]
fn sender_rejects_non_http_scheme() {
    let sender = RequestSender::new(HttpClient::new(None).unwrap());
    let url = Url::parse("ftp://example.com/auth").unwrap();
    let err = sender.send(Method::POST, &url, Some(&json!({}))).unwrap_err();
    assert!(matches!(err, SendError::InvalidRequest(_)), "{err:?}");
}

#[test]
fn sender_surfaces_transport_errors() {
    let sender = RequestSender::new(HttpClient::new(None).unwrap());
    let url = Url::parse(&closed_port_url()).unwrap();
    let err = sender.send(Method::POST, &url, Some(&json!({}))).unwrap_err();
    assert!(matches!(err, SendError::Transport(TransportError::Connect(_))), "{err:?}");
}
