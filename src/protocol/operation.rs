//! A2A protocol operations

use serde_json::Value;

use super::{
    error::A2AError,
    jsonrpc::{methods, CancelTaskRequest, GetTaskRequest, RequestId, SendMessageRequest},
};

/// A2A protocol operations
///
/// This enum represents the RPCs a client can issue against an agent's bound
/// endpoint. Each variant carries its own request id and params.
#[derive(Debug, Clone)]
pub enum A2AOperation {
    /// Send a message, creating or continuing a task
    SendMessage(SendMessageRequest),

    /// Get a task by ID
    GetTask(GetTaskRequest),

    /// Cancel a task
    CancelTask(CancelTaskRequest),
}

impl A2AOperation {
    /// JSON-RPC method name for this operation
    pub fn method(&self) -> &'static str {
        match self {
            A2AOperation::SendMessage(_) => methods::SEND_MESSAGE,
            A2AOperation::GetTask(_) => methods::GET_TASK,
            A2AOperation::CancelTask(_) => methods::CANCEL_TASK,
        }
    }

    /// Request id carried by this operation
    pub fn id(&self) -> &RequestId {
        match self {
            A2AOperation::SendMessage(req) => &req.id,
            A2AOperation::GetTask(req) => &req.id,
            A2AOperation::CancelTask(req) => &req.id,
        }
    }

    /// Params serialized as a JSON value
    pub fn params(&self) -> Result<Value, A2AError> {
        let params = match self {
            A2AOperation::SendMessage(req) => serde_json::to_value(&req.params)?,
            A2AOperation::GetTask(req) => serde_json::to_value(&req.params)?,
            A2AOperation::CancelTask(req) => serde_json::to_value(&req.params)?,
        };
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use crate::protocol::message::Message;

    use super::*;

    #[test]
    fn test_operation_methods() {
        let op = A2AOperation::SendMessage(SendMessageRequest::new(Message::user("test")));
        assert_eq!(op.method(), "message/send");

        let op = A2AOperation::GetTask(GetTaskRequest::new("task-123"));
        assert_eq!(op.method(), "tasks/get");
        assert_eq!(op.params().unwrap()["id"], "task-123");

        let op = A2AOperation::CancelTask(CancelTaskRequest::new("task-123"));
        assert_eq!(op.method(), "tasks/cancel");
    }

    #[test]
    fn test_operation_id() {
        let request = GetTaskRequest {
            id: RequestId::from(42),
            params: crate::protocol::jsonrpc::TaskQueryParams {
                id: "task-1".into(),
                history_length: None,
            },
        };
        let op = A2AOperation::GetTask(request);
        assert_eq!(op.id(), &RequestId::Number(42));
    }
}
