//! The agent behind the protocol adapter

use async_trait::async_trait;
use thiserror::Error;

use crate::protocol::{Artifact, Message, Task};

/// What the agent made of one turn of a task
#[derive(Debug, Clone, PartialEq)]
pub enum AgentOutcome {
    /// The task is done
    Completed {
        message: Option<Message>,
        artifacts: Vec<Artifact>,
    },

    /// The agent needs a follow-up message before it can continue
    InputRequired { message: Message },

    /// The agent gave up on the task
    Failed { reason: String },
}

impl AgentOutcome {
    /// Completed with a single text reply and no artifacts
    pub fn reply(text: impl Into<String>) -> Self {
        AgentOutcome::Completed {
            message: Some(Message::agent(text)),
            artifacts: Vec::new(),
        }
    }

    /// Ask the client for more input
    pub fn ask(text: impl Into<String>) -> Self {
        AgentOutcome::InputRequired {
            message: Message::agent(text),
        }
    }
}

/// Errors raised by an [`AgentRuntime`]
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The runtime is not able to take work right now
    #[error("Agent runtime unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Conversational agent driven by the request handler
///
/// `advance` receives the task as persisted, including the new message at the end
/// of its history, and decides where the task goes next. Errors mark the task failed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AgentRuntime: Send + Sync + 'static {
    async fn advance(&self, task: &Task, message: &Message) -> Result<AgentOutcome, RuntimeError>;
}
