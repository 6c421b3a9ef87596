//! Core A2A protocol service implementation

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use tower_service::Service;
use tracing::debug;

use crate::{
    codec::Codec,
    protocol::{error::A2AError, operation::A2AOperation},
    service::{A2ARequest, A2AResponse},
    transport::{Transport, TransportRequest, TransportResponse},
};

/// Core A2A protocol service that wraps a transport
///
/// This service implements the Tower `Service` trait and executes A2A operations
/// as JSON-RPC calls against the agent's bound endpoint.
pub struct A2AProtocolService<T> {
    transport: T,
    codec: Arc<dyn Codec>,
}

impl<T> A2AProtocolService<T>
where
    T: Transport,
{
    /// Create a new A2A protocol service
    ///
    /// # Arguments
    ///
    /// * `transport` - The underlying transport implementation
    /// * `codec` - The codec for serialization/deserialization
    pub fn new(transport: T, codec: Arc<dyn Codec>) -> Self {
        Self { transport, codec }
    }

    /// Build a transport request from an A2A operation
    fn build_transport_request(
        req: &A2ARequest,
        codec: &dyn Codec,
    ) -> Result<TransportRequest, A2AError> {
        // JSON-RPC calls all go to the bound endpoint itself
        let mut transport_req = TransportRequest::new("", "POST")
            .header("Content-Type", codec.content_type())
            .header("Accept", codec.content_type());

        for (key, value) in &req.context.metadata {
            transport_req = transport_req.header(key.clone(), value.clone());
        }

        let body = codec.encode_request(&req.operation)?;
        Ok(transport_req.body(body))
    }

    /// Parse a transport response into an A2A response
    fn parse_transport_response(
        transport_resp: TransportResponse,
        codec: &dyn Codec,
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if transport_resp.is_success() {
            return codec.decode_response(&transport_resp.body, operation);
        }

        // Some servers pair an error envelope with a 4xx/5xx status
        match codec.decode_response(&transport_resp.body, operation) {
            Ok(response) if !response.is_success() => Ok(response),
            _ => Err(A2AError::Transport(format!(
                "HTTP {}",
                transport_resp.status
            ))),
        }
    }
}

impl<T> Service<A2ARequest> for A2AProtocolService<T>
where
    T: Transport + Clone,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.transport.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        let transport = self.transport.clone();
        let codec = self.codec.clone();

        Box::pin(async move {
            let transport_req = Self::build_transport_request(&req, codec.as_ref())?;

            debug!(
                method = req.operation.method(),
                id = %req.operation.id(),
                agent = %transport.base_url(),
                "sending A2A request"
            );

            let transport_resp = match req.context.timeout {
                Some(timeout) => tokio::time::timeout(timeout, transport.execute(transport_req))
                    .await
                    .map_err(|_| A2AError::Timeout)??,
                None => transport.execute(transport_req).await?,
            };

            debug!(status = transport_resp.status, "received A2A response");

            Self::parse_transport_response(transport_resp, codec.as_ref(), &req.operation)
        })
    }
}

impl<T> Clone for A2AProtocolService<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
        }
    }
}
