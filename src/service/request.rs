//! A2A service request types

use std::{collections::HashMap, time::Duration};

use crate::protocol::operation::A2AOperation;

/// A request to the A2A service
///
/// This wraps an A2A operation with additional context needed for execution
#[derive(Debug, Clone)]
pub struct A2ARequest {
    /// The A2A operation to execute
    pub operation: A2AOperation,

    /// Request context (target, timeout, metadata)
    pub context: RequestContext,
}

impl A2ARequest {
    /// Create a new A2A request
    pub fn new(operation: A2AOperation, context: RequestContext) -> Self {
        Self { operation, context }
    }
}

/// Request context containing metadata and configuration
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// RPC endpoint of the target agent
    pub agent_url: String,

    /// Request timeout
    pub timeout: Option<Duration>,

    /// Additional metadata headers
    pub metadata: HashMap<String, String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(agent_url: impl Into<String>) -> Self {
        Self {
            agent_url: agent_url.into(),
            timeout: Some(Duration::from_secs(30)),
            metadata: HashMap::new(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Add a metadata header
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::jsonrpc::GetTaskRequest;

    #[test]
    fn test_request_context_creation() {
        let context = RequestContext::new("https://example.com")
            .with_timeout(Duration::from_secs(60))
            .with_metadata("key", "value");

        assert_eq!(context.agent_url, "https://example.com");
        assert_eq!(context.timeout, Some(Duration::from_secs(60)));
        assert_eq!(context.metadata.get("key"), Some(&"value".to_string()));
    }

    #[test]
    fn test_request_creation() {
        let operation = A2AOperation::GetTask(GetTaskRequest::new("task-1"));
        let request = A2ARequest::new(operation, RequestContext::new("https://example.com"));

        assert_eq!(request.context.agent_url, "https://example.com");
        assert_eq!(request.operation.method(), "tasks/get");
    }
}
