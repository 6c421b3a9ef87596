//! Agent card resolution

use std::time::Duration;

use futures::future::join_all;
use tracing::debug;
use url::Url;

use crate::{
    protocol::{agent::AGENT_CARD_PATH, error::A2AError, AgentCard},
    transport::join_url,
};

/// Fetches agent cards from their well-known location
///
/// Every call is a fresh GET; nothing is cached or retried.
#[derive(Debug, Clone)]
pub struct CardResolver {
    client: reqwest::Client,
}

impl CardResolver {
    /// Create a resolver with a default reqwest client
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Create a resolver whose requests give up after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self, A2AError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client))
    }

    /// Create a resolver with a custom reqwest client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Location of the card published under `base_url`
    pub fn card_url(base_url: &Url) -> String {
        join_url(base_url, AGENT_CARD_PATH)
    }

    /// Fetch and validate the card published under `base_url`
    ///
    /// Unreachable hosts and non-2xx statuses surface as transport errors,
    /// malformed or incomplete cards as protocol errors.
    pub async fn resolve(&self, base_url: &Url) -> Result<AgentCard, A2AError> {
        let card_url = Self::card_url(base_url);
        debug!(url = %card_url, "resolving agent card");

        let response = self.client.get(&card_url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(A2AError::Transport(format!(
                "Failed to fetch agent card from {}: HTTP {}",
                card_url, status
            )));
        }

        let body = response.bytes().await?;
        let card: AgentCard = serde_json::from_slice(&body).map_err(|e| {
            A2AError::Protocol(format!("Failed to parse agent card from {}: {}", card_url, e))
        })?;
        card.validate()?;

        Ok(card)
    }

    /// Resolve many base URLs concurrently
    ///
    /// Results come back in input order; one failure does not affect the others.
    pub async fn resolve_all(&self, base_urls: &[Url]) -> Vec<Result<AgentCard, A2AError>> {
        join_all(base_urls.iter().map(|url| self.resolve(url))).await
    }

    /// Resolve many base URLs given as text, concurrently
    ///
    /// A target that is not a valid URL fails with [`A2AError::Validation`] on its own;
    /// the other targets are still resolved. Results come back in input order.
    pub async fn resolve_targets<S: AsRef<str>>(
        &self,
        targets: &[S],
    ) -> Vec<Result<AgentCard, A2AError>> {
        join_all(targets.iter().map(|target| async move {
            let target = target.as_ref();
            match Url::parse(target) {
                Ok(url) => self.resolve(&url).await,
                Err(e) => Err(A2AError::Validation(format!(
                    "Invalid agent URL '{}': {}",
                    target, e
                ))),
            }
        }))
        .await
    }
}

impl Default for CardResolver {
    fn default() -> Self {
        Self::new()
    }
}
