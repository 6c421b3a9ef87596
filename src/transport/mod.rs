//! Transport abstraction layer for A2A protocol

pub mod http;
#[cfg(test)]
pub mod mock;

use std::{
    collections::HashMap,
    task::{Context, Poll},
};

use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

pub use http::HttpTransport;

use crate::protocol::error::A2AError;

/// Protocol-agnostic transport request
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Path relative to the transport's base URL; empty targets the base URL itself
    pub endpoint: String,

    /// HTTP method or equivalent operation (e.g., "POST", "GET")
    pub method: String,

    /// Headers or metadata for the request
    pub headers: HashMap<String, String>,

    /// Request body as bytes
    pub body: Bytes,
}

impl TransportRequest {
    /// Create a new transport request
    pub fn new(endpoint: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: method.into(),
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }
}

/// Protocol-agnostic transport response
#[derive(Debug)]
pub struct TransportResponse {
    /// Status code (e.g., HTTP status code)
    pub status: u16,

    /// Response headers or metadata
    pub headers: HashMap<String, String>,

    /// Response body as bytes
    pub body: Bytes,
}

impl TransportResponse {
    /// Create a new transport response
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Bytes::new(),
        }
    }

    /// Add a header to the response
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the response body
    pub fn body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Check if the response indicates success (2xx status code)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Core transport trait for executing protocol-agnostic requests
///
/// The protocol service only sees this trait, so tests can swap the HTTP client
/// for an in-memory handler.
#[async_trait]
pub trait Transport: Clone + Send + Sync + 'static {
    /// Check if the transport is ready to accept requests
    ///
    /// This is used by Tower's Service trait to implement backpressure
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>>;

    /// Execute a transport request asynchronously
    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError>;

    /// The endpoint this transport is bound to
    fn base_url(&self) -> &Url;
}

#[async_trait]
impl<T: Transport> Transport for Box<T> {
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), A2AError>> {
        (**self).poll_ready(cx)
    }

    async fn execute(&self, request: TransportRequest) -> Result<TransportResponse, A2AError> {
        (**self).execute(request).await
    }

    fn base_url(&self) -> &Url {
        (**self).base_url()
    }
}

/// Join `endpoint` onto `base` with exactly one slash between them
pub(crate) fn join_url(base: &Url, endpoint: &str) -> String {
    if endpoint.is_empty() {
        return base.to_string();
    }

    format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        let base = Url::parse("http://localhost:8080/a2a/").unwrap();
        assert_eq!(join_url(&base, ""), "http://localhost:8080/a2a/");
        assert_eq!(join_url(&base, "/health"), "http://localhost:8080/a2a/health");

        let base = Url::parse("http://localhost:8080").unwrap();
        assert_eq!(join_url(&base, "health"), "http://localhost:8080/health");
    }

    #[test]
    fn test_response_status() {
        assert!(TransportResponse::new(204).is_success());
        assert!(!TransportResponse::new(404).is_success());
        assert!(!TransportResponse::new(500).is_success());
    }
}
