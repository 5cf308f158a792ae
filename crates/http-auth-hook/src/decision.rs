// crates/http-auth-hook/src/decision.rs
// ============================================================================
// Module: HTTP Auth Hook Decisions
// Description: Response-to-verdict mapping with a replaceable policy.
// Purpose: Convert a completed HTTP exchange into allow or deny.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`Decider`] maps an [`HttpResponse`] onto a boolean. [`StatusDecider`]
//! allows exactly the 2xx range; a configured decider replaces it entirely.
//! [`evaluate`] is where the fail-closed rule lives: a failed send never
//! reaches the decider.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use crate::request::SendError;
use crate::transport::HttpResponse;

// ============================================================================
// SECTION: Decider Trait
// ============================================================================

/// Maps a completed HTTP exchange to an allow/deny outcome.
pub trait Decider: Send + Sync {
    /// Returns true when the response allows the request.
    fn decide(&self, response: &HttpResponse) -> bool;
}

/// Default policy: allow iff the status is in `[200, 300)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusDecider;

impl Decider for StatusDecider {
    fn decide(&self, response: &HttpResponse) -> bool {
        is_success_status(response.status)
    }
}

/// Callback handler signature used by [`CallbackDecider`].
type DecideHandler = dyn Fn(&HttpResponse) -> bool + Send + Sync;

/// Decider backed by a user-supplied function.
#[derive(Clone)]
pub struct CallbackDecider {
    /// Handler invoked with every response.
    handler: Arc<DecideHandler>,
}

impl CallbackDecider {
    /// Creates a decider from a handler function.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&HttpResponse) -> bool + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl fmt::Debug for CallbackDecider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackDecider").finish_non_exhaustive()
    }
}

impl Decider for CallbackDecider {
    fn decide(&self, response: &HttpResponse) -> bool {
        (self.handler)(response)
    }
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Outcome of one evaluated exchange.
#[derive(Debug)]
pub enum Verdict {
    /// The decider ran against a response.
    Decided {
        /// Decider output.
        allowed: bool,
        /// Status of the evaluated response.
        status: u16,
    },
    /// The send failed; the decider was not consulted.
    Failed(SendError),
}

impl Verdict {
    /// Returns true only for a decided, allowed outcome.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(
            self,
            Self::Decided {
                allowed: true,
                ..
            }
        )
    }
}

/// Applies `decider` to a send result, denying on any send error.
pub fn evaluate(decider: &dyn Decider, outcome: Result<HttpResponse, SendError>) -> Verdict {
    match outcome {
        Ok(response) => Verdict::Decided {
            allowed: decider.decide(&response),
            status: response.status,
        },
        Err(err) => Verdict::Failed(err),
    }
}

/// Returns true for 2xx status codes.
#[must_use]
pub const fn is_success_status(status: u16) -> bool {
    matches!(status, 200..=299)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
