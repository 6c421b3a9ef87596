//! A2A service response types

use crate::protocol::jsonrpc::{CancelTaskResponse, GetTaskResponse, SendMessageResponse};

/// Response from an A2A service operation
///
/// Each variant holds the full success-or-error envelope returned by the agent.
#[derive(Debug, Clone)]
pub enum A2AResponse {
    /// Envelope answering `message/send`
    SendMessage(Box<SendMessageResponse>),

    /// Envelope answering `tasks/get`
    GetTask(Box<GetTaskResponse>),

    /// Envelope answering `tasks/cancel`
    CancelTask(Box<CancelTaskResponse>),
}

impl A2AResponse {
    /// Extract the `message/send` envelope, if present
    pub fn into_send_message(self) -> Option<SendMessageResponse> {
        match self {
            A2AResponse::SendMessage(resp) => Some(*resp),
            _ => None,
        }
    }

    /// Extract the `tasks/get` envelope, if present
    pub fn into_get_task(self) -> Option<GetTaskResponse> {
        match self {
            A2AResponse::GetTask(resp) => Some(*resp),
            _ => None,
        }
    }

    /// Extract the `tasks/cancel` envelope, if present
    pub fn into_cancel_task(self) -> Option<CancelTaskResponse> {
        match self {
            A2AResponse::CancelTask(resp) => Some(*resp),
            _ => None,
        }
    }

    /// Whether the wrapped envelope is the success variant
    pub fn is_success(&self) -> bool {
        match self {
            A2AResponse::SendMessage(resp) => resp.is_success(),
            A2AResponse::GetTask(resp) => resp.is_success(),
            A2AResponse::CancelTask(resp) => resp.is_success(),
        }
    }
}
