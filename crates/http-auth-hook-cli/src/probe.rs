// crates/http-auth-hook-cli/src/probe.rs
// ============================================================================
// Module: Probe Execution
// Description: Builds the hook from file config and runs one check.
// Purpose: Exercise the live authorization service the way a broker would.
// Dependencies: http-auth-hook, thiserror
// ============================================================================

//! ## Overview
//! [`build_hook`] initializes an [`HttpAuthHook`] through the same
//! [`BrokerHook::init`] path a broker uses; [`run_probe`] then invokes the
//! matching broker callback for a [`ProbeCheck`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use http_auth_hook::AuthAuditSink;
use http_auth_hook::BrokerHook;
use http_auth_hook::Client;
use http_auth_hook::ConnectPacket;
use http_auth_hook::HookError;
use http_auth_hook::HttpAuthHook;
use thiserror::Error;

use crate::config::FileConfigError;
use crate::config::ProbeConfig;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Errors raised while preparing a probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// Configuration could not be loaded or converted.
    #[error(transparent)]
    Config(#[from] FileConfigError),
    /// The hook rejected its options.
    #[error("hook init failed: {0}")]
    Hook(#[from] HookError),
}

/// A single check to run against the authorization service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeCheck {
    /// Connect-time credential check.
    Connect {
        /// Client identifier.
        client_id: String,
        /// Username presented at connect.
        username: String,
        /// Password presented at connect.
        password: String,
    },
    /// Topic access check.
    Acl {
        /// Client identifier.
        client_id: String,
        /// Username bound to the session.
        username: String,
        /// Topic being accessed.
        topic: String,
        /// True for publish, false for subscribe.
        write: bool,
    },
}

// ============================================================================
// SECTION: Operations
// ============================================================================

/// Builds and initializes a hook from probe configuration.
///
/// When `audit` is `None` the hook's default stderr sink is used.
///
/// # Errors
///
/// Returns [`ProbeError`] when the options cannot be built or init fails.
pub fn build_hook(
    config: &ProbeConfig,
    audit: Option<Arc<dyn AuthAuditSink>>,
) -> Result<HttpAuthHook, ProbeError> {
    let mut options = config.to_options()?;
    options.audit = audit;
    let mut hook = HttpAuthHook::new();
    hook.init(Some(&options))?;
    Ok(hook)
}

/// Runs `check` through the matching broker callback.
#[must_use]
pub fn run_probe(hook: &HttpAuthHook, check: &ProbeCheck) -> bool {
    match check {
        ProbeCheck::Connect {
            client_id,
            username,
            password,
        } => hook.on_connect_authenticate(
            &Client::new(client_id.as_str(), username.as_str()),
            &ConnectPacket::new(username.as_str(), password.as_str()),
        ),
        ProbeCheck::Acl {
            client_id,
            username,
            topic,
            write,
        } => hook.on_acl_check(&Client::new(client_id.as_str(), username.as_str()), topic, *write),
    }
}
