//! Single-turn and multi-turn conversation flows over an [`AgentClient`]

use tower_service::Service;
use tracing::{debug, info};

use crate::{
    client::AgentClient,
    protocol::{
        error::A2AError,
        jsonrpc::{GetTaskRequest, SendMessageRequest, SendMessageResult},
        Message, Task,
    },
    service::{A2ARequest, A2AResponse},
};

/// Result of [`Driver::single_turn`]
#[derive(Debug, Clone)]
pub struct SingleTurn {
    /// What the agent answered to the message
    pub result: SendMessageResult,

    /// Snapshot fetched with `tasks/get` when the answer was a task
    pub snapshot: Option<Task>,
}

/// Result of [`Driver::multi_turn`]
#[derive(Debug, Clone)]
pub struct MultiTurn {
    /// Answer to the opening message
    pub first: SendMessageResult,

    /// Answer to the follow-up, sent only when the agent asked for more input
    pub follow_up: Option<SendMessageResult>,
}

/// Drives conversation flows against a bound agent
///
/// Error envelopes stop a flow with [`A2AError::Rejected`]; transport failures
/// propagate unchanged so callers can tell the two apart.
pub struct Driver<S> {
    client: AgentClient<S>,
}

impl<S> Driver<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    pub fn new(client: AgentClient<S>) -> Self {
        Self { client }
    }

    pub fn into_client(self) -> AgentClient<S> {
        self.client
    }

    /// Send `text` as a new conversation and fetch the resulting task once
    pub async fn single_turn(&mut self, text: &str) -> Result<SingleTurn, A2AError> {
        let result = self.send(Message::user(text)).await?;

        let snapshot = match result.as_task() {
            Some(task) => {
                let response = self.client.get_task(GetTaskRequest::new(&task.id)).await?;
                let snapshot = response.into_result().map_err(A2AError::Rejected)?;
                debug!(task_id = %snapshot.id, state = %snapshot.state(), "fetched task snapshot");
                Some(snapshot)
            }
            None => None,
        };

        Ok(SingleTurn { result, snapshot })
    }

    /// Send `first`, then `follow_up` on the same task if the agent asks for input
    pub async fn multi_turn(
        &mut self,
        first: &str,
        follow_up: &str,
    ) -> Result<MultiTurn, A2AError> {
        let result = self.send(Message::user(first)).await?;

        let continuation = match result.as_task() {
            Some(task) if task.requires_input() => {
                // send() already rejected tasks without a context id
                let context_id = task.context_id.clone().unwrap_or_default();
                info!(task_id = %task.id, %context_id, "agent requested more input");
                Some(
                    Message::user(follow_up)
                        .with_task_id(&task.id)
                        .with_context_id(context_id),
                )
            }
            _ => None,
        };

        let follow_up = match continuation {
            Some(message) => Some(self.send(message).await?),
            None => None,
        };

        Ok(MultiTurn {
            first: result,
            follow_up,
        })
    }

    async fn send(&mut self, message: Message) -> Result<SendMessageResult, A2AError> {
        let response = self
            .client
            .send_message(SendMessageRequest::new(message))
            .await?;
        let result = response.into_result().map_err(A2AError::Rejected)?;

        if let SendMessageResult::Task(task) = &result {
            if task.context_id.is_none() {
                return Err(A2AError::MissingContextId {
                    task_id: task.id.clone(),
                });
            }
            info!(task_id = %task.id, state = %task.state(), "agent returned task");
        }

        Ok(result)
    }
}
