// crates/http-auth-hook/src/hook.rs
// ============================================================================
// Module: HTTP Auth Hook
// Description: Broker hook delegating connect and ACL decisions over HTTP.
// Purpose: Orchestrate request building, sending, and decision evaluation.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`HttpAuthHook`] implements [`BrokerHook`] for the connect-authenticate and
//! ACL-check events. Each callback builds an [`AccessRequest`], sends it via
//! [`RequestSender`], and evaluates the result with the configured
//! [`Decider`].
//! Invariants:
//! - Every failure (uninitialized hook, send error) denies.
//! - Post-init state is immutable; callbacks take `&self` only.
//! - A failed [`HttpAuthHook::init`] leaves the hook exactly as it was.
//! - A successful init records one [`InitAuditEvent`] before installing state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::sync::Arc;

use url::Url;

use crate::audit::AuthAuditEvent;
use crate::audit::AuthAuditSink;
use crate::audit::InitAuditEvent;
use crate::audit::StderrAuditSink;
use crate::broker::BrokerHook;
use crate::broker::Client;
use crate::broker::ConnectPacket;
use crate::broker::HookEvent;
use crate::config::HookError;
use crate::config::HttpAuthOptions;
use crate::decision::Decider;
use crate::decision::StatusDecider;
use crate::decision::Verdict;
use crate::decision::evaluate;
use crate::request::AccessKind;
use crate::request::AccessRequest;
use crate::request::ConnectCheck;
use crate::request::RequestSender;
use crate::request::TopicCheck;
use crate::transport::HttpClient;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Identifier reported by [`HttpAuthHook::id`].
pub const HOOK_ID: &str = "http-auth-hook";

/// Reason recorded when a callback arrives before a successful init.
const NOT_INITIALIZED: &str = "hook not initialized";

// ============================================================================
// SECTION: Hook State
// ============================================================================

/// Immutable state installed by a successful init.
struct HookState {
    /// Sender wrapping the configured transport.
    sender: RequestSender,
    /// ACL endpoint.
    acl_host: Url,
    /// Client authentication endpoint.
    client_auth_host: Url,
    /// Reserved superuser endpoint.
    superuser_host: Option<Url>,
    /// Decision policy.
    decider: Arc<dyn Decider>,
    /// Audit sink.
    audit: Arc<dyn AuthAuditSink>,
}

// ============================================================================
// SECTION: HTTP Auth Hook
// ============================================================================

/// Broker hook that delegates auth decisions to an external HTTP service.
#[derive(Default)]
pub struct HttpAuthHook {
    /// Installed state; `None` until init succeeds.
    state: Option<HookState>,
}

impl HttpAuthHook {
    /// Creates an uninitialized hook.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: None,
        }
    }

    /// Creates a hook initialized from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when the options fail validation.
    pub fn from_options(options: &HttpAuthOptions) -> Result<Self, HookError> {
        let mut hook = Self::new();
        hook.apply(options)?;
        Ok(hook)
    }

    /// Returns true once init has succeeded.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Returns the configured ACL endpoint.
    #[must_use]
    pub fn acl_host(&self) -> Option<&Url> {
        self.state.as_ref().map(|state| &state.acl_host)
    }

    /// Returns the configured client authentication endpoint.
    #[must_use]
    pub fn client_auth_host(&self) -> Option<&Url> {
        self.state.as_ref().map(|state| &state.client_auth_host)
    }

    /// Returns the reserved superuser endpoint, if one was configured.
    #[must_use]
    pub fn superuser_host(&self) -> Option<&Url> {
        self.state.as_ref().and_then(|state| state.superuser_host.as_ref())
    }

    /// Validates `options` and installs fresh state on success only.
    fn apply(&mut self, options: &HttpAuthOptions) -> Result<(), HookError> {
        let hosts = options.validate()?;
        let client = HttpClient::new(options.transport.clone())?;
        let decider: Arc<dyn Decider> =
            options.decider.clone().unwrap_or_else(|| Arc::new(StatusDecider));
        let audit: Arc<dyn AuthAuditSink> =
            options.audit.clone().unwrap_or_else(|| Arc::new(StderrAuditSink));
        audit.record_init(&InitAuditEvent {
            event: InitAuditEvent::EVENT,
            hook_id: HOOK_ID,
            acl_host: hosts.acl_host.to_string(),
            client_auth_host: hosts.client_auth_host.to_string(),
            custom_transport: options.transport.is_some(),
            custom_decider: options.decider.is_some(),
        });
        self.state = Some(HookState {
            sender: RequestSender::new(client),
            acl_host: hosts.acl_host,
            client_auth_host: hosts.client_auth_host,
            superuser_host: hosts.superuser_host,
            decider,
            audit,
        });
        Ok(())
    }

    /// Sends, evaluates, and audits one access request.
    fn check(&self, request: &AccessRequest) -> bool {
        let Some(state) = &self.state else {
            StderrAuditSink.record(&AuthAuditEvent::failed(request, NOT_INITIALIZED));
            return false;
        };
        let outcome =
            state.sender.send_access(request, &state.client_auth_host, &state.acl_host);
        let verdict = evaluate(state.decider.as_ref(), outcome);
        let allowed = verdict.is_allowed();
        let event = match verdict {
            Verdict::Decided {
                allowed,
                status,
            } => AuthAuditEvent::decided(request, allowed, status),
            Verdict::Failed(err) => AuthAuditEvent::failed(request, err.to_string()),
        };
        state.audit.record(&event);
        allowed
    }
}

impl BrokerHook for HttpAuthHook {
    fn id(&self) -> &str {
        HOOK_ID
    }

    fn provides(&self, event: HookEvent) -> bool {
        matches!(event, HookEvent::ConnectAuthenticate | HookEvent::AclCheck)
    }

    fn init(&mut self, config: Option<&dyn Any>) -> Result<(), HookError> {
        let config = config.ok_or(HookError::NilConfig)?;
        let options =
            config.downcast_ref::<HttpAuthOptions>().ok_or(HookError::BadConfigShape)?;
        self.apply(options)
    }

    fn on_connect_authenticate(&self, client: &Client, packet: &ConnectPacket) -> bool {
        let request = AccessRequest::Connect(ConnectCheck {
            client_id: client.id.clone(),
            username: String::from_utf8_lossy(&packet.username).into_owned(),
            password: String::from_utf8_lossy(&packet.password).into_owned(),
        });
        self.check(&request)
    }

    fn on_acl_check(&self, client: &Client, topic: &str, write: bool) -> bool {
        let request = AccessRequest::Topic(TopicCheck {
            client_id: client.id.clone(),
            username: String::from_utf8_lossy(&client.properties.username).into_owned(),
            topic: topic.to_string(),
            access: AccessKind::from_write_flag(write),
        });
        self.check(&request)
    }
}
