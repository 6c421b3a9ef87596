//! Client configuration

use std::time::Duration;

use crate::protocol::agent::TransportKind;

/// Configuration for an A2A client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the agent card was resolved from
    pub agent_url: String,

    /// Per-request timeout applied by the transport
    pub timeout: Duration,

    /// Transport bindings this client may bind to
    pub accepted_transports: Vec<TransportKind>,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: Duration::from_secs(30),
            accepted_transports: vec![TransportKind::JsonRpc],
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the accepted transport bindings
    pub fn with_accepted_transports(mut self, transports: Vec<TransportKind>) -> Self {
        self.accepted_transports = transports;
        self
    }

    /// Whether `kind` is one of the accepted bindings
    pub fn accepts(&self, kind: &TransportKind) -> bool {
        self.accepted_transports.contains(kind)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("")
    }
}
