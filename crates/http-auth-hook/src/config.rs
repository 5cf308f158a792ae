// crates/http-auth-hook/src/config.rs
// ============================================================================
// Module: HTTP Auth Hook Configuration
// Description: Hook options, validation, and initialization errors.
// Purpose: Reject incomplete configuration before any check can run.
// Dependencies: thiserror, url
// ============================================================================

//! ## Overview
//! [`HttpAuthOptions`] carries the endpoints and injectable collaborators of
//! the hook. [`HttpAuthOptions::validate`] enforces that both the ACL and the
//! client authentication endpoints are present.
//! Invariants:
//! - `superuser_host` is retained but gates no behavior.
//! - Validation never mutates the options.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use crate::audit::AuthAuditSink;
use crate::decision::Decider;
use crate::transport::Transport;
use crate::transport::TransportError;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Hook initialization errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HookError {
    /// No configuration was supplied.
    #[error("nil config")]
    NilConfig,
    /// The configuration was not an [`HttpAuthOptions`] value.
    #[error("improper config: expected HttpAuthOptions")]
    BadConfigShape,
    /// A required endpoint URL is missing.
    #[error("hostname configs failed validation: missing {0}")]
    InvalidHosts(&'static str),
    /// The HTTP transport could not be constructed.
    #[error("transport setup failed: {0}")]
    Transport(#[from] TransportError),
}

// ============================================================================
// SECTION: Options
// ============================================================================

/// Configuration accepted by [`crate::HttpAuthHook::init`].
///
/// Timeouts, retries, and auth headers toward the external service are the
/// responsibility of the supplied [`Transport`].
#[derive(Clone, Default)]
pub struct HttpAuthOptions {
    /// Endpoint for topic access (ACL) checks.
    pub acl_host: Option<Url>,
    /// Endpoint for connect-time credential checks.
    pub client_auth_host: Option<Url>,
    /// Reserved superuser endpoint; never contacted.
    pub superuser_host: Option<Url>,
    /// Custom transport; the reqwest transport is used when absent.
    pub transport: Option<Arc<dyn Transport>>,
    /// Decision override; the 2xx status policy is used when absent.
    pub decider: Option<Arc<dyn Decider>>,
    /// Audit sink; stderr JSON lines are used when absent.
    pub audit: Option<Arc<dyn AuthAuditSink>>,
}

impl HttpAuthOptions {
    /// Builds options with both required endpoints set.
    #[must_use]
    pub fn new(acl_host: Url, client_auth_host: Url) -> Self {
        Self {
            acl_host: Some(acl_host),
            client_auth_host: Some(client_auth_host),
            ..Self::default()
        }
    }

    /// Sets the reserved superuser endpoint.
    #[must_use]
    pub fn with_superuser_host(mut self, superuser_host: Url) -> Self {
        self.superuser_host = Some(superuser_host);
        self
    }

    /// Sets the transport used for every exchange.
    #[must_use]
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Replaces the default status-code policy.
    #[must_use]
    pub fn with_decider(mut self, decider: impl Decider + 'static) -> Self {
        self.decider = Some(Arc::new(decider));
        self
    }

    /// Sets the audit sink receiving decision events.
    #[must_use]
    pub fn with_audit_sink(mut self, audit: impl AuthAuditSink + 'static) -> Self {
        self.audit = Some(Arc::new(audit));
        self
    }

    /// Checks that both required endpoints are present.
    ///
    /// # Errors
    ///
    /// Returns [`HookError::InvalidHosts`] naming the first missing endpoint.
    pub fn validate(&self) -> Result<ValidatedHosts, HookError> {
        let acl_host = self.acl_host.clone().ok_or(HookError::InvalidHosts("acl_host"))?;
        let client_auth_host =
            self.client_auth_host.clone().ok_or(HookError::InvalidHosts("client_auth_host"))?;
        Ok(ValidatedHosts {
            acl_host,
            client_auth_host,
            superuser_host: self.superuser_host.clone(),
        })
    }
}

impl fmt::Debug for HttpAuthOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpAuthOptions")
            .field("acl_host", &self.acl_host)
            .field("client_auth_host", &self.client_auth_host)
            .field("superuser_host", &self.superuser_host)
            .field("custom_transport", &self.transport.is_some())
            .field("custom_decider", &self.decider.is_some())
            .field("custom_audit", &self.audit.is_some())
            .finish()
    }
}

/// Endpoint set that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHosts {
    /// ACL endpoint.
    pub acl_host: Url,
    /// Client authentication endpoint.
    pub client_auth_host: Url,
    /// Reserved superuser endpoint.
    pub superuser_host: Option<Url>,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
