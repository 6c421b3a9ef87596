//! JSON-RPC 2.0 envelopes for the A2A methods
//!
//! Every response is exactly one of success or error. [`JsonRpcResponse`] is a
//! two-variant sum type and its deserializer rejects payloads carrying both a
//! `result` and an `error`, or neither.

use std::fmt;

use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{message::Message, task::Task};

pub const JSONRPC_VERSION: &str = "2.0";

/// Error codes used in error envelopes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;
    pub const TASK_NOT_FOUND: i64 = -32001;
    pub const TASK_NOT_CANCELABLE: i64 = -32002;
}

/// Method names of the A2A JSON-RPC binding
pub mod methods {
    pub const SEND_MESSAGE: &str = "message/send";
    pub const GET_TASK: &str = "tasks/get";
    pub const CANCEL_TASK: &str = "tasks/cancel";
}

/// JSON-RPC request identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

impl RequestId {
    /// A fresh random string id
    pub fn generate() -> Self {
        RequestId::String(Uuid::new_v4().to_string())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        RequestId::Null
    }
}

impl From<&str> for RequestId {
    fn from(id: &str) -> Self {
        RequestId::String(id.to_string())
    }
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Number(id)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => f.write_str(s),
            RequestId::Null => f.write_str("null"),
        }
    }
}

/// Raw JSON-RPC 2.0 request envelope as it travels on the wire
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: RequestId,
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn parse_error(detail: impl fmt::Display) -> Self {
        Self::new(error_codes::PARSE_ERROR, format!("Parse error: {}", detail))
    }

    pub fn invalid_request(detail: impl fmt::Display) -> Self {
        Self::new(
            error_codes::INVALID_REQUEST,
            format!("Invalid request: {}", detail),
        )
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", method),
        )
    }

    pub fn invalid_params(detail: impl fmt::Display) -> Self {
        Self::new(
            error_codes::INVALID_PARAMS,
            format!("Invalid params: {}", detail),
        )
    }

    pub fn internal(detail: impl fmt::Display) -> Self {
        Self::new(
            error_codes::INTERNAL_ERROR,
            format!("Internal error: {}", detail),
        )
    }

    pub fn task_not_found(task_id: &str) -> Self {
        Self::new(
            error_codes::TASK_NOT_FOUND,
            format!("Task not found: {}", task_id),
        )
    }

    pub fn task_not_cancelable(task_id: &str, state: impl fmt::Display) -> Self {
        Self::new(
            error_codes::TASK_NOT_CANCELABLE,
            format!("Task {} cannot be canceled in state {}", task_id, state),
        )
    }

    pub fn is_task_not_found(&self) -> bool {
        self.code == error_codes::TASK_NOT_FOUND
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JSON-RPC error {}: {}", self.code, self.message)
    }
}

/// Successful response envelope
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SuccessResponse<T> {
    pub jsonrpc: String,
    pub id: RequestId,
    pub result: T,
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub jsonrpc: String,
    pub id: RequestId,
    pub error: JsonRpcError,
}

/// A JSON-RPC response: exactly one of success or error
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum JsonRpcResponse<T> {
    Success(SuccessResponse<T>),
    Error(ErrorResponse),
}

impl<T> JsonRpcResponse<T> {
    pub fn success(id: RequestId, result: T) -> Self {
        JsonRpcResponse::Success(SuccessResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result,
        })
    }

    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        JsonRpcResponse::Error(ErrorResponse {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            error,
        })
    }

    pub fn id(&self) -> &RequestId {
        match self {
            JsonRpcResponse::Success(resp) => &resp.id,
            JsonRpcResponse::Error(resp) => &resp.id,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JsonRpcResponse::Success(_))
    }

    /// Split into the result or the error payload
    pub fn into_result(self) -> Result<T, JsonRpcError> {
        match self {
            JsonRpcResponse::Success(resp) => Ok(resp.result),
            JsonRpcResponse::Error(resp) => Err(resp.error),
        }
    }

    /// Map the success payload, keeping error envelopes as they are
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> JsonRpcResponse<U> {
        match self {
            JsonRpcResponse::Success(resp) => JsonRpcResponse::success(resp.id, f(resp.result)),
            JsonRpcResponse::Error(resp) => JsonRpcResponse::Error(resp),
        }
    }
}

impl<'de, T> Deserialize<'de> for JsonRpcResponse<T>
where
    T: DeserializeOwned,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        let mut object = Map::<String, Value>::deserialize(deserializer)?;

        let jsonrpc = match object.remove("jsonrpc") {
            Some(Value::String(version)) => version,
            Some(other) => {
                return Err(D::Error::custom(format!(
                    "invalid jsonrpc version: {}",
                    other
                )))
            }
            None => JSONRPC_VERSION.to_string(),
        };
        let id = match object.remove("id") {
            Some(id) => serde_json::from_value(id).map_err(D::Error::custom)?,
            None => RequestId::Null,
        };

        match (object.remove("result"), object.remove("error")) {
            (Some(result), None) => Ok(JsonRpcResponse::Success(SuccessResponse {
                jsonrpc,
                id,
                result: serde_json::from_value(result).map_err(D::Error::custom)?,
            })),
            (None, Some(error)) => Ok(JsonRpcResponse::Error(ErrorResponse {
                jsonrpc,
                id,
                error: serde_json::from_value(error).map_err(D::Error::custom)?,
            })),
            (Some(_), Some(_)) => Err(D::Error::custom(
                "response carries both 'result' and 'error'",
            )),
            (None, None) => Err(D::Error::custom(
                "response carries neither 'result' nor 'error'",
            )),
        }
    }
}

/// Optional knobs of a `message/send` call
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendConfiguration {
    /// Wait for the agent to settle before answering (default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
}

/// Params of `message/send`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MessageSendParams {
    pub message: Message,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<MessageSendConfiguration>,
}

impl MessageSendParams {
    pub fn new(message: Message) -> Self {
        Self {
            message,
            configuration: None,
        }
    }

    pub fn is_blocking(&self) -> bool {
        self.configuration
            .as_ref()
            .and_then(|c| c.blocking)
            .unwrap_or(true)
    }
}

/// Params of `tasks/get`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskQueryParams {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_length: Option<usize>,
}

/// Params naming a single task, used by `tasks/cancel`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskIdParams {
    pub id: String,
}

/// Request to send a message, creating or continuing a task
#[derive(Debug, Clone, PartialEq)]
pub struct SendMessageRequest {
    pub id: RequestId,
    pub params: MessageSendParams,
}

impl SendMessageRequest {
    /// Wrap a message with a fresh request id
    pub fn new(message: Message) -> Self {
        Self {
            id: RequestId::generate(),
            params: MessageSendParams::new(message),
        }
    }

    /// Ask the server to answer before the agent has settled
    pub fn non_blocking(mut self) -> Self {
        self.params
            .configuration
            .get_or_insert_with(Default::default)
            .blocking = Some(false);
        self
    }
}

/// Request to query a task
#[derive(Debug, Clone, PartialEq)]
pub struct GetTaskRequest {
    pub id: RequestId,
    pub params: TaskQueryParams,
}

impl GetTaskRequest {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            id: RequestId::generate(),
            params: TaskQueryParams {
                id: task_id.into(),
                history_length: None,
            },
        }
    }
}

/// Request to cancel a task
#[derive(Debug, Clone, PartialEq)]
pub struct CancelTaskRequest {
    pub id: RequestId,
    pub params: TaskIdParams,
}

impl CancelTaskRequest {
    pub fn new(task_id: impl Into<String>) -> Self {
        Self {
            id: RequestId::generate(),
            params: TaskIdParams { id: task_id.into() },
        }
    }
}

/// Result of `message/send`: the task it created or advanced, or a direct reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SendMessageResult {
    Task(Task),
    Message(Message),
}

impl SendMessageResult {
    pub fn as_task(&self) -> Option<&Task> {
        match self {
            SendMessageResult::Task(task) => Some(task),
            SendMessageResult::Message(_) => None,
        }
    }

    pub fn into_task(self) -> Option<Task> {
        match self {
            SendMessageResult::Task(task) => Some(task),
            SendMessageResult::Message(_) => None,
        }
    }
}

pub type SendMessageResponse = JsonRpcResponse<SendMessageResult>;
pub type GetTaskResponse = JsonRpcResponse<Task>;
pub type CancelTaskResponse = JsonRpcResponse<Task>;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::protocol::task::TaskState;

    #[test]
    fn test_request_id_forms() {
        let ids: Vec<RequestId> = serde_json::from_value(json!(["abc", 7, null])).unwrap();
        assert_eq!(
            ids,
            vec![RequestId::from("abc"), RequestId::from(7), RequestId::Null]
        );
        assert_eq!(serde_json::to_value(RequestId::Null).unwrap(), Value::Null);
    }

    #[test]
    fn test_decode_success_task() {
        let json = json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "result": {
                "kind": "task",
                "id": "t-1",
                "contextId": "ctx-1",
                "status": {"state": "input-required"}
            }
        });

        let response: SendMessageResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.id(), &RequestId::from("req-1"));
        let task = response.into_result().unwrap().into_task().unwrap();
        assert_eq!(task.id, "t-1");
        assert_eq!(task.state(), TaskState::InputRequired);
    }

    #[test]
    fn test_decode_success_message() {
        let json = json!({
            "jsonrpc": "2.0",
            "id": 3,
            "result": {
                "kind": "message",
                "role": "agent",
                "messageId": "m-1",
                "parts": [{"kind": "text", "text": "hello"}]
            }
        });

        let response: SendMessageResponse = serde_json::from_value(json).unwrap();
        match response.into_result().unwrap() {
            SendMessageResult::Message(message) => assert_eq!(message.text(), "hello"),
            other => panic!("Expected message result, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_error() {
        let json = json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "error": {"code": -32001, "message": "Task not found: t-9"}
        });

        let response: GetTaskResponse = serde_json::from_value(json).unwrap();
        assert!(!response.is_success());
        let error = response.into_result().unwrap_err();
        assert!(error.is_task_not_found());
    }

    #[test]
    fn test_reject_both_result_and_error() {
        let json = json!({
            "jsonrpc": "2.0",
            "id": "req-1",
            "result": {"id": "t-1", "status": {"state": "working"}},
            "error": {"code": -32603, "message": "boom"}
        });

        let err = serde_json::from_value::<GetTaskResponse>(json).unwrap_err();
        assert!(err.to_string().contains("both"));
    }

    #[test]
    fn test_reject_neither_result_nor_error() {
        let json = json!({"jsonrpc": "2.0", "id": "req-1"});

        let err = serde_json::from_value::<GetTaskResponse>(json).unwrap_err();
        assert!(err.to_string().contains("neither"));
    }

    #[test]
    fn test_serialize_envelopes() {
        let task = Task::new("t-1", "ctx-1");
        let ok = SendMessageResponse::success(RequestId::from(1), SendMessageResult::Task(task));
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["result"]["kind"], "task");
        assert!(json.get("error").is_none());

        let err = GetTaskResponse::error(RequestId::Null, JsonRpcError::task_not_found("t-2"));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error"]["code"], -32001);
        assert!(json.get("result").is_none());
        assert_eq!(json["id"], Value::Null);
    }

    #[test]
    fn test_non_blocking_configuration() {
        let request = SendMessageRequest::new(Message::user("hi"));
        assert!(request.params.is_blocking());

        let request = request.non_blocking();
        assert!(!request.params.is_blocking());
        let json = serde_json::to_value(&request.params).unwrap();
        assert_eq!(json["configuration"]["blocking"], false);
    }
}
