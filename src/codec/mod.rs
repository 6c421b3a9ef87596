//! Serialization codecs for different protocol bindings

pub mod jsonrpc;

pub use jsonrpc::JsonRpcCodec;

use crate::{
    protocol::{error::A2AError, operation::A2AOperation},
    service::response::A2AResponse,
};
use bytes::Bytes;

/// Codec trait for encoding and decoding A2A protocol messages
///
/// Each codec implements one protocol binding (JSON-RPC today).
pub trait Codec: Send + Sync {
    /// Serialize an A2A operation to bytes for transport
    ///
    /// # Arguments
    ///
    /// * `operation` - The A2A operation to encode
    ///
    /// # Returns
    ///
    /// The serialized bytes or an error
    fn encode_request(&self, operation: &A2AOperation) -> Result<Bytes, A2AError>;

    /// Deserialize transport response bytes to an A2A response
    ///
    /// # Arguments
    ///
    /// * `body` - The response body bytes
    /// * `operation` - The original operation (selects the expected result type)
    ///
    /// # Returns
    ///
    /// The deserialized A2A response or an error
    fn decode_response(
        &self,
        body: &[u8],
        operation: &A2AOperation,
    ) -> Result<A2AResponse, A2AError>;

    /// Get the content type for this codec
    fn content_type(&self) -> &str;
}
