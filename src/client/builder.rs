//! Client builder for constructing A2A clients with composable layers

use std::{sync::Arc, time::Duration};

use tower::ServiceBuilder;
use tracing::debug;
use url::Url;

use crate::{
    client::{AgentClient, ClientConfig},
    codec::{Codec, JsonRpcCodec},
    layer::{A2AValidationLayer, A2AValidationService},
    protocol::{
        agent::{AgentCard, TransportKind},
        error::A2AError,
    },
    service::A2AProtocolService,
    transport::{HttpTransport, Transport},
};

/// Client produced by [`A2AClientBuilder::build`]
pub type LayeredClient<T> = AgentClient<A2AValidationService<A2AProtocolService<T>>>;

/// Client bound to an agent over the HTTP JSONRPC binding
pub type HttpAgentClient = LayeredClient<HttpTransport>;

/// Builder for constructing A2A clients
///
/// # Example
///
/// ```rust,no_run
/// use a2a_bridge::prelude::*;
///
/// # async fn example() -> Result<(), A2AError> {
/// let base: url::Url = "http://localhost:8080".parse().unwrap();
/// let card = CardResolver::new().resolve(&base).await?;
/// let mut client = A2AClientBuilder::from_card(&card, ClientConfig::new(base.as_str()))?
///     .build()?;
///
/// let response = client.send_message(SendMessageRequest::new(Message::user("hello"))).await?;
/// println!("{:?}", response.into_result());
/// # Ok(())
/// # }
/// ```
///
/// # Compiler Error
/// This will fail to compile if it is not clear to the compiler which type implementing
/// `Transport` is being used as underlying transport. This is expected behaviour.
///
/// ```compile_fail
/// let client = A2AClientBuilder::new(agent_url()).build();
/// ```
pub struct A2AClientBuilder<T: Transport> {
    agent_url: Url,
    transport: Option<T>,
    codec: Option<Arc<dyn Codec>>,
    timeout: Duration,
}

impl<T: Transport> A2AClientBuilder<T> {
    /// Start a builder for the agent at `agent_url`; a transport must be supplied
    pub fn new(agent_url: Url) -> Self {
        Self {
            agent_url,
            transport: None,
            codec: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Use a custom transport
    pub fn with_transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Use a custom codec
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the A2A client
    ///
    /// Stacks the validation layer on top of the protocol service.
    ///
    /// # Errors
    ///
    /// Returns an error if no transport has been configured
    pub fn build(self) -> Result<LayeredClient<T>, A2AError> {
        let transport = self.transport.ok_or_else(|| {
            A2AError::Protocol("Transport not configured. Call with_transport()".into())
        })?;

        let codec = self.codec.unwrap_or_else(|| Arc::new(JsonRpcCodec));

        let service = ServiceBuilder::new()
            .layer(A2AValidationLayer::new())
            .service(A2AProtocolService::new(transport, codec));

        let config = ClientConfig::new(self.agent_url.as_str()).with_timeout(self.timeout);

        Ok(AgentClient::new(service, config))
    }
}

impl A2AClientBuilder<HttpTransport> {
    /// Create a new client builder posting JSON-RPC to `agent_url`
    pub fn new_http(agent_url: Url) -> Self {
        let transport = HttpTransport::new(agent_url.clone());
        Self::bound(agent_url, transport, Duration::from_secs(30))
    }

    fn bound(agent_url: Url, transport: HttpTransport, timeout: Duration) -> Self {
        Self {
            agent_url,
            transport: Some(transport),
            codec: Some(Arc::new(JsonRpcCodec)),
            timeout,
        }
    }

    /// Bind a builder to the first transport in `card` that `config` accepts
    ///
    /// Transports are tried in card order. A card without transports is reached
    /// over JSONRPC at its `url`.
    ///
    /// # Errors
    ///
    /// Returns [`A2AError::UnsupportedTransport`] when the card offers transports
    /// but none of them is accepted, [`A2AError::Protocol`] when the selected
    /// endpoint is not a valid URL, and the reqwest error when the HTTP client
    /// cannot be built.
    pub fn from_card(card: &AgentCard, config: ClientConfig) -> Result<Self, A2AError> {
        let endpoint = if card.transports.is_empty() {
            if !config.accepts(&TransportKind::JsonRpc) {
                return Err(A2AError::UnsupportedTransport {
                    offered: vec![TransportKind::JsonRpc.to_string()],
                });
            }
            card.url.as_str()
        } else {
            card.transports
                .iter()
                .find(|t| config.accepts(&t.kind()) && t.kind() == TransportKind::JsonRpc)
                .map(|t| t.url.as_str())
                .ok_or_else(|| A2AError::UnsupportedTransport {
                    offered: card
                        .transports
                        .iter()
                        .map(|t| t.transport_type.clone())
                        .collect(),
                })?
        };

        let url = Url::parse(endpoint).map_err(|e| {
            A2AError::Protocol(format!("Agent endpoint '{}' is invalid: {}", endpoint, e))
        })?;

        debug!(agent = %card.name, endpoint = %url, "bound client to agent transport");

        let transport = HttpTransport::with_timeout(url.clone(), config.timeout)?;
        Ok(Self::bound(url, transport, config.timeout))
    }
}
