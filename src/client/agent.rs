//! High-level A2A agent client

use std::time::Duration;

use tower::ServiceExt;
use tower_service::Service;

use crate::{
    client::config::ClientConfig,
    protocol::{
        error::A2AError,
        jsonrpc::{
            CancelTaskRequest, CancelTaskResponse, GetTaskRequest, GetTaskResponse,
            SendMessageRequest, SendMessageResponse,
        },
        A2AOperation, Task,
    },
    service::{A2ARequest, A2AResponse, RequestContext},
};

/// High-level A2A client for interacting with agents
///
/// This client wraps a Tower service and provides one method per RPC. Every method
/// returns the agent's full envelope: `Err` means the call never produced a valid
/// envelope, `Ok` with an error envelope means the agent rejected the request.
pub struct AgentClient<S> {
    service: S,
    config: ClientConfig,
}

impl<S> AgentClient<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError>,
{
    /// Create a new agent client
    ///
    /// # Arguments
    ///
    /// * `service` - The Tower service that handles requests
    /// * `config` - Client configuration
    pub fn new(service: S, config: ClientConfig) -> Self {
        Self { service, config }
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn build_context(&self) -> RequestContext {
        RequestContext::new(self.config.agent_url.clone()).with_timeout(self.config.timeout)
    }

    async fn call(&mut self, operation: A2AOperation) -> Result<A2AResponse, A2AError> {
        let request = A2ARequest::new(operation, self.build_context());
        self.service.ready().await?.call(request).await
    }

    /// Send a message, creating a task or continuing the one named by its `task_id`
    ///
    /// One round trip, no retry.
    pub async fn send_message(
        &mut self,
        request: SendMessageRequest,
    ) -> Result<SendMessageResponse, A2AError> {
        self.call(A2AOperation::SendMessage(request))
            .await?
            .into_send_message()
            .ok_or_else(|| A2AError::Protocol("Expected message/send response".into()))
    }

    /// Query a task's current snapshot
    pub async fn get_task(&mut self, request: GetTaskRequest) -> Result<GetTaskResponse, A2AError> {
        self.call(A2AOperation::GetTask(request))
            .await?
            .into_get_task()
            .ok_or_else(|| A2AError::Protocol("Expected tasks/get response".into()))
    }

    /// Ask the agent to cancel a task
    pub async fn cancel_task(
        &mut self,
        request: CancelTaskRequest,
    ) -> Result<CancelTaskResponse, A2AError> {
        self.call(A2AOperation::CancelTask(request))
            .await?
            .into_cancel_task()
            .ok_or_else(|| A2AError::Protocol("Expected tasks/cancel response".into()))
    }

    /// Poll a task until it is terminal or waiting for input
    ///
    /// # Arguments
    ///
    /// * `task_id` - The task ID to poll
    /// * `interval` - Delay between polls
    /// * `max_attempts` - Maximum number of polls (0 = unlimited)
    ///
    /// # Errors
    ///
    /// [`A2AError::TaskNotFound`] when the agent does not know the task,
    /// [`A2AError::Rejected`] for any other error envelope and
    /// [`A2AError::PollExhausted`] when `max_attempts` polls all found the task in progress.
    pub async fn poll_task(
        &mut self,
        task_id: &str,
        interval: Duration,
        max_attempts: usize,
    ) -> Result<Task, A2AError> {
        let mut attempts = 0;

        loop {
            let task = self
                .get_task(GetTaskRequest::new(task_id))
                .await?
                .into_result()
                .map_err(|error| {
                    if error.is_task_not_found() {
                        A2AError::TaskNotFound {
                            task_id: task_id.to_string(),
                        }
                    } else {
                        A2AError::Rejected(error)
                    }
                })?;

            if task.is_terminal() || task.requires_input() {
                return Ok(task);
            }

            attempts += 1;
            if max_attempts > 0 && attempts >= max_attempts {
                let state = task.state();
                return Err(A2AError::PollExhausted {
                    task_id: task.id,
                    state,
                });
            }

            tokio::time::sleep(interval).await;
        }
    }
}
