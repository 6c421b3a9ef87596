//! A2A task types and lifecycle management

use std::{collections::HashMap, fmt};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    error::A2AError,
    message::{Message, Part},
};

/// A task in the A2A protocol
///
/// Tasks are the server-tracked unit of work correlating one or more messages.
/// They move from submitted through working to a terminal state, possibly pausing
/// in input-required while waiting for a follow-up message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task, assigned by the server
    pub id: String,

    /// Groups related tasks and turns of one conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    /// Current status of the task
    pub status: TaskStatus,

    /// Outputs produced by the agent
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<Artifact>,

    /// Messages exchanged on this task, oldest first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<Message>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

impl Task {
    /// Create a new task in the submitted state
    pub fn new(id: impl Into<String>, context_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context_id: Some(context_id.into()),
            status: TaskStatus::new(TaskState::Submitted),
            artifacts: Vec::new(),
            history: Vec::new(),
            metadata: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> TaskState {
        self.status.state
    }

    /// Check if the task is in a terminal state
    pub fn is_terminal(&self) -> bool {
        self.status.state.is_terminal()
    }

    /// Check if the task waits for a follow-up message
    pub fn requires_input(&self) -> bool {
        self.status.state == TaskState::InputRequired
    }

    /// Advance the task to `to`, attaching an optional status message
    ///
    /// Fails without touching the task when the state machine does not allow the move.
    pub fn transition(&mut self, to: TaskState, message: Option<Message>) -> Result<(), A2AError> {
        let from = self.status.state;
        if !from.can_transition_to(to) {
            return Err(A2AError::InvalidTransition {
                task_id: self.id.clone(),
                from,
                to,
            });
        }

        self.status = TaskStatus {
            state: to,
            message,
            timestamp: Some(Utc::now()),
        };
        Ok(())
    }

    /// Set the context ID
    pub fn with_context_id(mut self, context_id: impl Into<String>) -> Self {
        self.context_id = Some(context_id.into());
        self
    }

    /// Add an artifact
    pub fn with_artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    /// Copy of the task keeping only the last `length` history entries
    pub fn with_history_length(&self, length: Option<usize>) -> Self {
        let mut task = self.clone();
        if let Some(length) = length {
            let skip = task.history.len().saturating_sub(length);
            task.history.drain(..skip);
        }
        task
    }
}

/// Status of a task: its state plus an optional message from the agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskStatus {
    pub state: TaskState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl TaskStatus {
    pub fn new(state: TaskState) -> Self {
        Self {
            state,
            message: None,
            timestamp: Some(Utc::now()),
        }
    }
}

/// Task state in the A2A protocol lifecycle
///
/// Lifecycle: submitted → working → completed, with working ⇄ input-required for
/// multi-turn exchanges. Failed and canceled are reachable from any non-terminal state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskState {
    /// Task has been received and is queued for processing
    Submitted,

    /// Task is currently being processed
    Working,

    /// Task waits for a follow-up message from the client
    InputRequired,

    /// Task completed successfully
    Completed,

    /// Task failed with an error
    Failed,

    /// Task was canceled
    Canceled,
}

impl TaskState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Completed | TaskState::Failed | TaskState::Canceled
        )
    }

    /// Whether the lifecycle allows moving from `self` to `next`
    pub fn can_transition_to(&self, next: TaskState) -> bool {
        use TaskState::*;

        if self.is_terminal() {
            return false;
        }

        match (self, next) {
            (_, Failed | Canceled) => true,
            (Submitted, Working) => true,
            (Working, Completed | InputRequired) => true,
            (InputRequired, Working) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Submitted => "submitted",
            TaskState::Working => "working",
            TaskState::InputRequired => "input-required",
            TaskState::Completed => "completed",
            TaskState::Failed => "failed",
            TaskState::Canceled => "canceled",
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artifacts represent task outputs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// Unique identifier of the Artifact
    pub artifact_id: String,

    /// A human readable name for the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// A human readable description of the Artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Contents of the Artifact
    pub parts: Vec<Part>,
}

impl Artifact {
    /// Create a single-part text artifact
    pub fn text(artifact_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            artifact_id: artifact_id.into(),
            name: None,
            description: None,
            parts: vec![Part::text(text)],
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
