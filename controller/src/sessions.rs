//! Peer session registry: which server name is bound to which address.
//!
//! This is the trust store of the control plane. A sender is trusted if and
//! only if its address is bound to some server name here. Entries are created
//! by a successful login handshake and removed on revocation (for example
//! when the server is stopped).

use log::info;
use protocol::Address;
use std::collections::HashMap;

/// Mapping from server name to the address that completed its handshake.
///
/// At most one address per server name. The first handshake wins: a later
/// login for an already bound name does not move the session, so a replayed
/// stale login packet cannot take over a live server's identity.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<String, Address>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if any session is bound to this exact address.
    ///
    /// Linear scan; the registry holds one entry per fleet server.
    pub fn is_verified(&self, address: &Address) -> bool {
        self.sessions.values().any(|bound| bound == address)
    }

    pub fn is_server_verified(&self, server: &str) -> bool {
        self.sessions.contains_key(server)
    }

    /// Binds `server` to `address` unless the name already has a session.
    ///
    /// Returns whether a new session was created.
    pub fn verify(&mut self, server: &str, address: Address) -> bool {
        if self.sessions.contains_key(server) {
            return false;
        }
        info!("Session opened for {} at {}", server, address);
        self.sessions.insert(server.to_string(), address);
        true
    }

    /// Removes the session of `server`, if any, and returns its address.
    pub fn unverify(&mut self, server: &str) -> Option<Address> {
        let removed = self.sessions.remove(server);
        if let Some(address) = &removed {
            info!("Session closed for {} at {}", server, address);
        }
        removed
    }

    /// Reverse lookup: the server name bound to `address`.
    pub fn session_name_for(&self, address: &Address) -> Option<&str> {
        self.sessions
            .iter()
            .find(|(_, bound)| *bound == address)
            .map(|(name, _)| name.as_str())
    }

    pub fn client_for(&self, server: &str) -> Option<&Address> {
        self.sessions.get(server)
    }

    /// All (server name, address) pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Address)> {
        self.sessions
            .iter()
            .map(|(name, address)| (name.as_str(), address))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
