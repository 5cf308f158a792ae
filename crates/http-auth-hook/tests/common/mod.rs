// crates/http-auth-hook/tests/common/mod.rs
// ============================================================================
// Module: Common Test Utilities
// Description: Shared helpers for http-auth-hook integration tests.
// Purpose: Run a one-shot local HTTP server and capture what it received.
// Dependencies: tiny_http
// ============================================================================

//! ## Overview
//! Provides a single-request HTTP fixture so transport and hook tests can run
//! against a real socket without external services.

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
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::thread;
use std::thread::JoinHandle;

use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: Captured Requests
// ============================================================================

/// What the fixture server saw for its single request.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request method as sent.
    pub method: String,
    /// Request path (and query).
    pub path: String,
    /// Content-Type header, if any.
    pub content_type: Option<String>,
    /// Raw request body.
    pub body: Vec<u8>,
}

// ============================================================================
// SECTION: Server Fixture
// ============================================================================

/// Serves exactly one request with `status` and `body`.
///
/// Returns the base URL and a handle yielding the captured request.
pub fn serve_once(status: u16, body: Vec<u8>) -> (String, JoinHandle<CapturedRequest>) {
    serve_once_with_header(status, body, None)
}

/// Like [`serve_once`], adding one response header.
pub fn serve_once_with_header(
    status: u16,
    body: Vec<u8>,
    header: Option<(&'static str, &'static str)>,
) -> (String, JoinHandle<CapturedRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let base = format!("http://{addr}");

    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = Vec::new();
        request.as_reader().read_to_end(&mut received).unwrap();
        let captured = CapturedRequest {
            method: request.method().as_str().to_string(),
            path: request.url().to_string(),
            content_type: request
                .headers()
                .iter()
                .find(|header| header.field.equiv("Content-Type"))
                .map(|header| header.value.as_str().to_string()),
            body: received,
        };
        let mut response = Response::from_data(body).with_status_code(status);
        if let Some((name, value)) = header {
            response.add_header(Header::from_bytes(name.as_bytes(), value.as_bytes()).unwrap());
        }
        let _ = request.respond(response);
        captured
    });

    (base, handle)
}

/// Returns a loopback URL with nothing listening on it.
pub fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
