// crates/http-auth-hook/src/broker.rs
// ============================================================================
// Module: Broker Hook Contract
// Description: Hook interface and session types consumed from the broker.
// Purpose: Describe the broker-side callbacks an auth hook implements.
// Dependencies: thiserror (via HookError)
// ============================================================================

//! ## Overview
//! The broker dispatches lifecycle events to registered hooks. A hook
//! advertises the events it handles via [`BrokerHook::provides`]; the broker
//! only invokes callbacks for advertised events. Events form the closed
//! [`HookEvent`] enum.
//! Invariants:
//! - Auth callbacks default to deny for hooks that do not override them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;

use crate::config::HookError;

// ============================================================================
// SECTION: Hook Events
// ============================================================================

/// Broker lifecycle events a hook may handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HookEvent {
    /// Broker finished starting.
    Started,
    /// Broker is stopping.
    Stopped,
    /// Client connect credentials must be authenticated.
    ConnectAuthenticate,
    /// Client publish/subscribe access must be authorized.
    AclCheck,
    /// Client connected.
    Connect,
    /// Client session established.
    SessionEstablished,
    /// Client disconnected.
    Disconnect,
    /// Subscribe packet received.
    Subscribe,
    /// Publish packet received.
    Publish,
    /// Retained message stored.
    RetainMessage,
    /// Will message sent.
    WillSent,
    /// Inactive client expired.
    ClientExpired,
    /// Retained message expired.
    RetainedExpired,
}

impl HookEvent {
    /// Every event, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Started,
        Self::Stopped,
        Self::ConnectAuthenticate,
        Self::AclCheck,
        Self::Connect,
        Self::SessionEstablished,
        Self::Disconnect,
        Self::Subscribe,
        Self::Publish,
        Self::RetainMessage,
        Self::WillSent,
        Self::ClientExpired,
        Self::RetainedExpired,
    ];
}

// ============================================================================
// SECTION: Session Types
// ============================================================================

/// Properties the broker tracks for a connected client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientProperties {
    /// Username bound to the session (raw bytes as received).
    pub username: Vec<u8>,
}

/// Connected (or connecting) client as seen by hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Client {
    /// Client identifier.
    pub id: String,
    /// Session properties.
    pub properties: ClientProperties,
}

impl Client {
    /// Builds a client with the given identifier and session username.
    pub fn new(id: impl Into<String>, username: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            properties: ClientProperties {
                username: username.into(),
            },
        }
    }
}

/// Credentials carried by a CONNECT packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectPacket {
    /// Username field (raw bytes).
    pub username: Vec<u8>,
    /// Password field (raw bytes).
    pub password: Vec<u8>,
}

impl ConnectPacket {
    /// Builds a connect packet from username and password bytes.
    pub fn new(username: impl Into<Vec<u8>>, password: impl Into<Vec<u8>>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// ============================================================================
// SECTION: Hook Trait
// ============================================================================

/// Callback interface the broker invokes on registered hooks.
pub trait BrokerHook: Send + Sync {
    /// Stable hook identifier.
    fn id(&self) -> &str;

    /// Returns true when the hook handles `event`.
    fn provides(&self, event: HookEvent) -> bool;

    /// Initializes the hook with an opaque, hook-specific configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HookError`] when the configuration is absent, of the wrong
    /// type, or incomplete.
    fn init(&mut self, config: Option<&dyn Any>) -> Result<(), HookError>;

    /// Decides whether a connecting client may establish a session.
    fn on_connect_authenticate(&self, _client: &Client, _packet: &ConnectPacket) -> bool {
        false
    }

    /// Decides whether a client may read from or write to `topic`.
    fn on_acl_check(&self, _client: &Client, _topic: &str, _write: bool) -> bool {
        false
    }
}
