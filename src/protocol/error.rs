//! Error types for A2A protocol operations

use thiserror::Error;

use super::{jsonrpc::JsonRpcError, task::TaskState};

/// Main error type for A2A protocol operations
#[derive(Debug, Error)]
pub enum A2AError {
    /// Transport-level error (connection refused, DNS failure, non-2xx status)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out at the transport layer
    #[error("Request timeout")]
    Timeout,

    /// Protocol-level error (malformed card, malformed envelope, unexpected variant)
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Validation error (invalid request or response)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The agent answered with a JSON-RPC error envelope
    #[error("Agent rejected request: {0}")]
    Rejected(JsonRpcError),

    /// Task not found error
    #[error("Task not found: {task_id}")]
    TaskNotFound { task_id: String },

    /// A lifecycle transition that the state machine does not allow
    #[error("Invalid task transition for {task_id}: {from} -> {to}")]
    InvalidTransition {
        task_id: String,
        from: TaskState,
        to: TaskState,
    },

    /// None of the transports advertised by the agent card is supported
    #[error("No supported transport among: {offered:?}")]
    UnsupportedTransport { offered: Vec<String> },

    /// Polling gave up while the agent kept reporting the task as in progress
    #[error("Task {task_id} still {state} after polling")]
    PollExhausted { task_id: String, state: TaskState },

    /// A successful task response without a context id
    #[error("Task {task_id} was returned without a context id")]
    MissingContextId { task_id: String },
}

impl A2AError {
    /// The agent could not be reached at all (connection, DNS, timeout, HTTP status)
    pub fn is_unreachable(&self) -> bool {
        matches!(self, A2AError::Transport(_) | A2AError::Timeout)
    }

    /// The agent was reached and answered with an error envelope
    pub fn is_rejected(&self) -> bool {
        matches!(self, A2AError::Rejected(_))
    }
}

/// Result type alias for A2A operations
pub type A2AResult<T> = Result<T, A2AError>;

impl From<reqwest::Error> for A2AError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            A2AError::Timeout
        } else if err.is_connect() {
            A2AError::Transport(format!("Connection error: {}", err))
        } else if err.is_decode() {
            A2AError::Protocol(err.to_string())
        } else {
            A2AError::Transport(err.to_string())
        }
    }
}
