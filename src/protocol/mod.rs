//! Core A2A protocol types and definitions

pub mod agent;
pub mod error;
pub mod jsonrpc;
pub mod message;
pub mod operation;
pub mod task;

pub use agent::{
    AgentCapabilities, AgentCard, AgentSkill, AgentTransport, SkillParameter, SkillReturns,
    TransportKind, AGENT_CARD_PATH, LEGACY_AGENT_CARD_PATH, PROTOCOL_VERSION,
};
pub use error::{A2AError, A2AResult};
pub use jsonrpc::{
    CancelTaskRequest, CancelTaskResponse, GetTaskRequest, GetTaskResponse, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, MessageSendParams, RequestId, SendMessageRequest,
    SendMessageResponse, SendMessageResult,
};
pub use message::{Message, Part, Role};
pub use operation::A2AOperation;
pub use task::{Artifact, Task, TaskState, TaskStatus};
