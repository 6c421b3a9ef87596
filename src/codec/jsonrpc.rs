//! JSON-RPC 2.0 codec for A2A protocol
//!
//! This codec wraps A2A operations in JSON-RPC 2.0 envelopes and decodes the
//! success-or-error response envelopes into typed results.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::{
    codec::Codec,
    protocol::{
        error::A2AError,
        jsonrpc::{JsonRpcRequest, JsonRpcResponse, RequestId},
        operation::A2AOperation,
    },
    service::response::A2AResponse,
};

/// JSON-RPC 2.0 codec that wraps A2A operations
#[derive(Debug, Clone, Default)]
pub struct JsonRpcCodec;

impl JsonRpcCodec {
    /// Create a new JSON-RPC codec
    pub fn new() -> Self {
        Self
    }

    fn decode_envelope<T: DeserializeOwned>(
        body: &[u8],
        expected_id: &RequestId,
    ) -> Result<JsonRpcResponse<T>, A2AError> {
        let response: JsonRpcResponse<T> = serde_json::from_slice(body).map_err(|e| {
            A2AError::Protocol(format!("Failed to parse JSON-RPC response: {}", e))
        })?;

        // Servers answer parse failures with a null id, so only a concrete mismatch is fatal
        let id = response.id();
        if *id != RequestId::Null && id != expected_id {
            return Err(A2AError::Protocol(format!(
                "JSON-RPC response id {} does not match request id {}",
                id, expected_id
            )));
        }

        Ok(response)
    }
}

impl Codec for JsonRpcCodec {
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError> {
        let request = JsonRpcRequest::new(
            operation.id().clone(),
            operation.method(),
            operation.params()?,
        );

        let bytes = serde_json::to_vec(&request)?;
        Ok(Bytes::from(bytes))
    }

    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError> {
        if body.is_empty() {
            return Err(A2AError::Protocol("Empty JSON-RPC response body".into()));
        }

        let id = operation.id();
        let response = match operation {
            A2AOperation::SendMessage(_) => {
                A2AResponse::SendMessage(Box::new(Self::decode_envelope(body, id)?))
            }
            A2AOperation::GetTask(_) => {
                A2AResponse::GetTask(Box::new(Self::decode_envelope(body, id)?))
            }
            A2AOperation::CancelTask(_) => {
                A2AResponse::CancelTask(Box::new(Self::decode_envelope(body, id)?))
            }
        };

        Ok(response)
    }

    fn content_type(&self) -> &str {
        "application/json"
    }
}
