//! JSON-RPC request handling for the server side of the A2A protocol
//!
//! Dispatches JSON-RPC methods:
//! - `message/send` creates a task or continues one waiting for input
//! - `tasks/get` returns the last persisted snapshot of a task
//! - `tasks/cancel` cancels a task that has not settled yet

use std::{collections::HashMap, sync::Arc};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    protocol::{
        error::A2AError,
        jsonrpc::{
            error_codes, methods, CancelTaskRequest, CancelTaskResponse, GetTaskRequest,
            GetTaskResponse, JsonRpcError, JsonRpcRequest, JsonRpcResponse, MessageSendParams,
            RequestId, SendMessageRequest, SendMessageResponse, SendMessageResult,
            JSONRPC_VERSION,
        },
        Message, Task, TaskState,
    },
    server::{
        runtime::{AgentOutcome, AgentRuntime},
        store::{InMemoryTaskStore, TaskStore},
    },
};

/// Serves A2A RPCs on top of an [`AgentRuntime`] and a [`TaskStore`]
///
/// State changes of one task are serialized through a per-task lock; the runtime
/// itself runs outside the lock so a cancel can land while the agent is working.
/// Locks exist only for known tasks that have not settled yet.
#[derive(Clone)]
pub struct RequestHandler {
    runtime: Arc<dyn AgentRuntime>,
    store: Arc<dyn TaskStore>,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl RequestHandler {
    pub fn new(runtime: Arc<dyn AgentRuntime>, store: Arc<dyn TaskStore>) -> Self {
        Self {
            runtime,
            store,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Handler keeping its tasks in memory
    pub fn in_memory(runtime: impl AgentRuntime) -> Self {
        Self::new(Arc::new(runtime), Arc::new(InMemoryTaskStore::new()))
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    /// Handle `message/send`
    ///
    /// A message without `taskId` opens a new task; one with `taskId` continues a task
    /// that is waiting for input. The agent's failures end up in the task, not in the
    /// envelope.
    pub async fn handle_send_message(&self, request: SendMessageRequest) -> SendMessageResponse {
        let history_length = request
            .params
            .configuration
            .as_ref()
            .and_then(|c| c.history_length);

        match self.send_message(request.params).await {
            Ok(task) => SendMessageResponse::success(
                request.id,
                SendMessageResult::Task(task.with_history_length(history_length)),
            ),
            Err(error) => {
                debug!(id = %request.id, %error, "message/send rejected");
                SendMessageResponse::error(request.id, error)
            }
        }
    }

    /// Handle `tasks/get`
    pub async fn handle_get_task(&self, request: GetTaskRequest) -> GetTaskResponse {
        match self.load(&request.params.id).await {
            Ok(task) => GetTaskResponse::success(
                request.id,
                task.with_history_length(request.params.history_length),
            ),
            Err(error) => GetTaskResponse::error(request.id, error),
        }
    }

    /// Handle `tasks/cancel`
    pub async fn handle_cancel_task(&self, request: CancelTaskRequest) -> CancelTaskResponse {
        match self.cancel_task(&request.params.id).await {
            Ok(task) => CancelTaskResponse::success(request.id, task),
            Err(error) => CancelTaskResponse::error(request.id, error),
        }
    }

    /// Handle one raw JSON-RPC request body and produce the response envelope
    pub async fn dispatch(&self, body: &[u8]) -> Value {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => return error_json(RequestId::Null, JsonRpcError::parse_error(e)),
        };

        // Echo whatever id we can recover, even from a malformed request
        let id = value
            .get("id")
            .cloned()
            .and_then(|id| serde_json::from_value::<RequestId>(id).ok())
            .unwrap_or_default();

        let JsonRpcRequest {
            jsonrpc,
            method,
            params,
            id,
        } = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => return error_json(id, JsonRpcError::invalid_request(e)),
        };

        if jsonrpc != JSONRPC_VERSION {
            return error_json(
                id,
                JsonRpcError::invalid_request(format!("unsupported jsonrpc version {jsonrpc:?}")),
            );
        }

        debug!(%method, %id, "dispatching JSON-RPC request");

        match method.as_str() {
            methods::SEND_MESSAGE => match parse_params(params) {
                Ok(params) => to_json(
                    &self
                        .handle_send_message(SendMessageRequest { id, params })
                        .await,
                ),
                Err(error) => error_json(id, error),
            },
            methods::GET_TASK => match parse_params(params) {
                Ok(params) => to_json(&self.handle_get_task(GetTaskRequest { id, params }).await),
                Err(error) => error_json(id, error),
            },
            methods::CANCEL_TASK => match parse_params(params) {
                Ok(params) => to_json(
                    &self
                        .handle_cancel_task(CancelTaskRequest { id, params })
                        .await,
                ),
                Err(error) => error_json(id, error),
            },
            other => error_json(id, JsonRpcError::method_not_found(other)),
        }
    }

    async fn send_message(&self, params: MessageSendParams) -> Result<Task, JsonRpcError> {
        let blocking = params.is_blocking();
        let message = params.message;

        if message.parts.is_empty() {
            return Err(JsonRpcError::invalid_params(
                "message must have at least one part",
            ));
        }

        let Some(task_id) = message.task_id.clone() else {
            return self.open_task(message, blocking).await;
        };

        let (task, message) = self.resume_task(&task_id, message).await?;
        if blocking {
            self.finish_turn(task, message).await
        } else {
            let handler = self.clone();
            let snapshot = task.clone();
            tokio::spawn(async move {
                if let Err(error) = handler.finish_turn(task, message).await {
                    warn!(%task_id, %error, "background turn failed");
                }
            });
            Ok(snapshot)
        }
    }

    async fn open_task(&self, mut message: Message, blocking: bool) -> Result<Task, JsonRpcError> {
        let task_id = Uuid::now_v7().to_string();
        let context_id = message
            .context_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        message.task_id = Some(task_id.clone());
        message.context_id = Some(context_id.clone());

        let mut task = Task::new(task_id, context_id);
        task.history.push(message.clone());
        self.persist(&task).await?;

        info!(task_id = %task.id, context_id = ?task.context_id, "created task");

        if blocking {
            let task = self.start_turn(&task.id).await?;
            return self.finish_turn(task, message).await;
        }

        let handler = self.clone();
        let task_id = task.id.clone();
        tokio::spawn(async move {
            let result = match handler.start_turn(&task_id).await {
                Ok(task) => handler.finish_turn(task, message).await.map(|_| ()),
                Err(error) => Err(error),
            };
            if let Err(error) = result {
                warn!(%task_id, %error, "background turn failed");
            }
        });

        Ok(task)
    }

    /// Move a freshly submitted task to working
    async fn start_turn(&self, task_id: &str) -> Result<Task, JsonRpcError> {
        let (_guard, mut task) = self
            .lock_active(task_id, |task| {
                JsonRpcError::invalid_params(format!(
                    "task {} is already {}",
                    task.id,
                    task.state()
                ))
            })
            .await?;

        task.transition(TaskState::Working, None)
            .map_err(JsonRpcError::invalid_params)?;
        self.persist(&task).await?;
        Ok(task)
    }

    /// Attach a follow-up message to a task waiting for input and move it to working
    async fn resume_task(
        &self,
        task_id: &str,
        mut message: Message,
    ) -> Result<(Task, Message), JsonRpcError> {
        let (_guard, mut task) = self
            .lock_active(task_id, |task| {
                JsonRpcError::new(
                    error_codes::TASK_NOT_FOUND,
                    format!("Task {} is {} and cannot be continued", task.id, task.state()),
                )
            })
            .await?;

        if let Some(context_id) = &message.context_id {
            if task.context_id.as_deref() != Some(context_id.as_str()) {
                return Err(JsonRpcError::invalid_params(format!(
                    "context {} does not match context of task {}",
                    context_id, task.id
                )));
            }
        }

        if !task.requires_input() {
            return Err(JsonRpcError::invalid_params(format!(
                "task {} is {} and not waiting for input",
                task.id,
                task.state()
            )));
        }

        message.context_id = task.context_id.clone();
        task.history.push(message.clone());
        task.transition(TaskState::Working, None)
            .map_err(JsonRpcError::internal)?;
        self.persist(&task).await?;

        info!(task_id = %task.id, "resumed task");
        Ok((task, message))
    }

    /// Run the agent on a working task and record where it ended up
    async fn finish_turn(&self, task: Task, message: Message) -> Result<Task, JsonRpcError> {
        let outcome = self.runtime.advance(&task, &message).await;

        let lock = self.task_lock(&task.id).await;
        let _guard = lock.lock().await;

        let mut current = self.load(&task.id).await?;
        if current.is_terminal() {
            info!(task_id = %current.id, state = %current.state(), "discarding agent outcome");
            self.release_lock(&current.id).await;
            return Ok(current);
        }

        let (state, status_message) = match outcome {
            Ok(AgentOutcome::Completed { message, artifacts }) => {
                current.artifacts.extend(artifacts);
                (TaskState::Completed, message)
            }
            Ok(AgentOutcome::InputRequired { message }) => {
                (TaskState::InputRequired, Some(message))
            }
            Ok(AgentOutcome::Failed { reason }) => {
                (TaskState::Failed, Some(Message::agent(reason)))
            }
            Err(error) => {
                warn!(task_id = %current.id, %error, "agent runtime failed");
                (TaskState::Failed, Some(Message::agent(error.to_string())))
            }
        };

        let status_message = status_message.map(|mut m| {
            m.task_id = Some(current.id.clone());
            m.context_id = current.context_id.clone();
            m
        });
        if state != TaskState::Failed {
            current.history.extend(status_message.clone());
        }

        current
            .transition(state, status_message)
            .map_err(JsonRpcError::internal)?;
        self.persist(&current).await?;
        if current.is_terminal() {
            self.release_lock(&current.id).await;
        }

        info!(task_id = %current.id, state = %current.state(), "task advanced");
        Ok(current)
    }

    async fn cancel_task(&self, task_id: &str) -> Result<Task, JsonRpcError> {
        let (_guard, mut task) = self
            .lock_active(task_id, |task| {
                JsonRpcError::task_not_cancelable(&task.id, task.state())
            })
            .await?;

        task.transition(TaskState::Canceled, None)
            .map_err(JsonRpcError::internal)?;
        self.persist(&task).await?;
        self.release_lock(task_id).await;

        info!(task_id, "canceled task");
        Ok(task)
    }

    /// Take the lock of a task that exists and has not settled
    ///
    /// Unknown tasks fail before a lock is created; settled tasks fail with `settled`.
    async fn lock_active(
        &self,
        task_id: &str,
        settled: impl Fn(&Task) -> JsonRpcError,
    ) -> Result<(OwnedMutexGuard<()>, Task), JsonRpcError> {
        let task = self.load(task_id).await?;
        if task.is_terminal() {
            return Err(settled(&task));
        }

        let guard = self.task_lock(task_id).await.lock_owned().await;

        // Reload under the lock, the task may have settled while we waited
        let task = self.load(task_id).await?;
        if task.is_terminal() {
            self.release_lock(task_id).await;
            return Err(settled(&task));
        }

        Ok((guard, task))
    }

    async fn task_lock(&self, task_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(task_id.to_string()).or_default().clone()
    }

    /// Forget the lock of a settled task; nothing mutates it anymore
    async fn release_lock(&self, task_id: &str) {
        self.locks.lock().await.remove(task_id);
    }

    async fn load(&self, task_id: &str) -> Result<Task, JsonRpcError> {
        self.store
            .get(task_id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| JsonRpcError::task_not_found(task_id))
    }

    async fn persist(&self, task: &Task) -> Result<(), JsonRpcError> {
        self.store.save(task).await.map_err(store_error)
    }
}

fn store_error(error: A2AError) -> JsonRpcError {
    warn!(%error, "task store failed");
    JsonRpcError::internal(error)
}

fn parse_params<P: DeserializeOwned>(params: Value) -> Result<P, JsonRpcError> {
    serde_json::from_value(params).map_err(JsonRpcError::invalid_params)
}

fn to_json<T: Serialize>(response: &JsonRpcResponse<T>) -> Value {
    serde_json::to_value(response).unwrap_or_else(|e| {
        error_json(response.id().clone(), JsonRpcError::internal(e))
    })
}

fn error_json(id: RequestId, error: JsonRpcError) -> Value {
    json!({
        "jsonrpc": JSONRPC_VERSION,
        "id": id,
        "error": error,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::Notify;
    use tokio_test::{assert_err, assert_ok};

    use crate::{
        protocol::Artifact,
        server::runtime::{MockAgentRuntime, RuntimeError},
    };

    use super::*;

    fn replying(text: &'static str) -> RequestHandler {
        let mut runtime = MockAgentRuntime::new();
        runtime
            .expect_advance()
            .returning(move |_, _| Ok(AgentOutcome::reply(text)));
        RequestHandler::in_memory(runtime)
    }

    /// Asks for a city on the first turn, answers on the second
    fn weather() -> RequestHandler {
        let mut runtime = MockAgentRuntime::new();
        runtime.expect_advance().returning(|task, _| {
            if task.history.len() == 1 {
                Ok(AgentOutcome::ask("Which city?"))
            } else {
                Ok(AgentOutcome::Completed {
                    message: Some(Message::agent("Sunny")),
                    artifacts: vec![Artifact::text("forecast", "Sunny, 21C")],
                })
            }
        });
        RequestHandler::in_memory(runtime)
    }

    async fn send(handler: &RequestHandler, message: Message) -> Result<Task, JsonRpcError> {
        handler
            .handle_send_message(SendMessageRequest::new(message))
            .await
            .into_result()
            .map(|result| result.into_task().unwrap())
    }

    #[tokio::test]
    async fn test_new_task_completes() {
        let handler = replying("hello back");

        let task = assert_ok!(send(&handler, Message::user("hello")).await);
        assert_eq!(task.state(), TaskState::Completed);
        assert_eq!(Uuid::parse_str(&task.id).unwrap().get_version_num(), 7);
        assert!(task.context_id.is_some());
        assert_eq!(task.history.len(), 2);
        assert_eq!(task.status.message.unwrap().text(), "hello back");

        let stored = handler.store().get(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.state(), TaskState::Completed);
    }

    #[tokio::test]
    async fn test_context_id_is_kept() {
        let handler = replying("ok");
        let task = assert_ok!(send(&handler, Message::user("hi").with_context_id("ctx-7")).await);
        assert_eq!(task.context_id.as_deref(), Some("ctx-7"));
    }

    #[tokio::test]
    async fn test_multi_turn_continuation() {
        let handler = weather();

        let first = assert_ok!(send(&handler, Message::user("what is the weather")).await);
        assert_eq!(first.state(), TaskState::InputRequired);
        let context_id = first.context_id.clone().unwrap();

        let follow_up = Message::user("new york")
            .with_task_id(&first.id)
            .with_context_id(&context_id);
        let second = assert_ok!(send(&handler, follow_up).await);

        assert_eq!(second.id, first.id);
        assert_eq!(second.context_id.as_deref(), Some(context_id.as_str()));
        assert_eq!(second.state(), TaskState::Completed);
        assert_eq!(second.artifacts.len(), 1);
        assert_eq!(second.history.len(), 4);
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let handler = replying("ok");
        let error = assert_err!(send(&handler, Message::user("hi").with_task_id("nope")).await);
        assert_eq!(error.code, error_codes::TASK_NOT_FOUND);

        let response = handler.handle_get_task(GetTaskRequest::new("nope")).await;
        assert!(response.into_result().unwrap_err().is_task_not_found());
    }

    #[tokio::test]
    async fn test_terminal_task_cannot_be_continued() {
        let handler = replying("done");
        let task = assert_ok!(send(&handler, Message::user("hi")).await);

        let error = assert_err!(send(&handler, Message::user("more").with_task_id(&task.id)).await);
        assert_eq!(error.code, error_codes::TASK_NOT_FOUND);

        let stored = handler.store().get(&task.id).await.unwrap().unwrap();
        assert_eq!(stored.state(), TaskState::Completed);
    }

    #[tokio::test]
    async fn test_context_mismatch() {
        let handler = weather();
        let task = assert_ok!(send(&handler, Message::user("weather?")).await);

        let follow_up = Message::user("boston")
            .with_task_id(&task.id)
            .with_context_id("another-context");
        let error = assert_err!(send(&handler, follow_up).await);
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_empty_parts() {
        let handler = replying("ok");
        let mut message = Message::user("x");
        message.parts.clear();

        let error = assert_err!(send(&handler, message).await);
        assert_eq!(error.code, error_codes::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn test_runtime_error_fails_task() {
        let mut runtime = MockAgentRuntime::new();
        runtime
            .expect_advance()
            .times(1)
            .returning(|_, _| Err(RuntimeError::Unavailable("model offline".into())));
        let handler = RequestHandler::in_memory(runtime);

        let task = assert_ok!(send(&handler, Message::user("hi")).await);
        assert_eq!(task.state(), TaskState::Failed);
        assert!(task.status.message.unwrap().text().contains("model offline"));
    }

    #[tokio::test]
    async fn test_failed_outcome() {
        let mut runtime = MockAgentRuntime::new();
        runtime.expect_advance().returning(|_, _| {
            Ok(AgentOutcome::Failed {
                reason: "cannot answer".into(),
            })
        });
        let handler = RequestHandler::in_memory(runtime);

        let task = assert_ok!(send(&handler, Message::user("hi")).await);
        assert_eq!(task.state(), TaskState::Failed);
        assert_eq!(task.status.message.unwrap().text(), "cannot answer");
    }

    #[tokio::test]
    async fn test_get_task_history_length() {
        let handler = weather();
        let task = assert_ok!(send(&handler, Message::user("weather?")).await);

        let mut request = GetTaskRequest::new(&task.id);
        request.params.history_length = Some(1);
        let snapshot = handler
            .handle_get_task(request)
            .await
            .into_result()
            .unwrap();

        assert_eq!(snapshot.history.len(), 1);
        assert_eq!(snapshot.history[0].text(), "Which city?");
    }

    #[tokio::test]
    async fn test_cancel() {
        let handler = weather();
        let task = assert_ok!(send(&handler, Message::user("weather?")).await);

        let canceled = handler
            .handle_cancel_task(CancelTaskRequest::new(&task.id))
            .await
            .into_result()
            .unwrap();
        assert_eq!(canceled.state(), TaskState::Canceled);

        let again = handler
            .handle_cancel_task(CancelTaskRequest::new(&task.id))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(again.code, error_codes::TASK_NOT_CANCELABLE);

        let unknown = handler
            .handle_cancel_task(CancelTaskRequest::new("nope"))
            .await
            .into_result()
            .unwrap_err();
        assert_eq!(unknown.code, error_codes::TASK_NOT_FOUND);
    }

    struct Gated {
        gate: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl AgentRuntime for Gated {
        async fn advance(&self, _: &Task, _: &Message) -> Result<AgentOutcome, RuntimeError> {
            self.gate.notified().await;
            Ok(AgentOutcome::reply("too late"))
        }
    }

    #[tokio::test]
    async fn test_outcome_after_cancel_is_discarded() {
        let gate = Arc::new(Notify::new());
        let handler = RequestHandler::in_memory(Gated { gate: gate.clone() });

        let submitted = handler
            .handle_send_message(SendMessageRequest::new(Message::user("slow")).non_blocking())
            .await
            .into_result()
            .unwrap()
            .into_task()
            .unwrap();
        assert_eq!(submitted.state(), TaskState::Submitted);

        assert_ok!(
            handler
                .handle_cancel_task(CancelTaskRequest::new(&submitted.id))
                .await
                .into_result()
        );
        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stored = handler.store().get(&submitted.id).await.unwrap().unwrap();
        assert_eq!(stored.state(), TaskState::Canceled);
    }

    #[tokio::test]
    async fn test_dispatch_errors() {
        let handler = replying("ok");

        let parse = handler.dispatch(b"{not json").await;
        assert_eq!(parse["error"]["code"], error_codes::PARSE_ERROR);
        assert!(parse["id"].is_null());

        let version = handler
            .dispatch(br#"{"jsonrpc":"1.0","id":3,"method":"tasks/get","params":{"id":"x"}}"#)
            .await;
        assert_eq!(version["error"]["code"], error_codes::INVALID_REQUEST);
        assert_eq!(version["id"], 3);

        let unknown = handler
            .dispatch(br#"{"jsonrpc":"2.0","id":"r-1","method":"tasks/list"}"#)
            .await;
        assert_eq!(unknown["error"]["code"], error_codes::METHOD_NOT_FOUND);
        assert_eq!(unknown["id"], "r-1");

        let params = handler
            .dispatch(br#"{"jsonrpc":"2.0","id":"r-2","method":"message/send","params":{}}"#)
            .await;
        assert_eq!(params["error"]["code"], error_codes::INVALID_PARAMS);
        assert_eq!(params["id"], "r-2");
    }

    #[tokio::test]
    async fn test_dispatch_send_message() {
        let handler = replying("hi there");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "messageId": "m-1",
                    "parts": [{"kind": "text", "text": "hello"}]
                }
            }
        });

        let response = handler.dispatch(body.to_string().as_bytes()).await;
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["kind"], "task");
        assert_eq!(response["result"]["status"]["state"], "completed");
        assert!(response.get("error").is_none());
    }

    async fn lock_entries(handler: &RequestHandler) -> usize {
        handler.locks.lock().await.len()
    }

    #[tokio::test]
    async fn test_unknown_task_ids_create_no_locks() {
        let handler = replying("ok");

        for i in 0..100 {
            let bogus = format!("bogus-{i}");
            let error =
                assert_err!(send(&handler, Message::user("hi").with_task_id(&bogus)).await);
            assert_eq!(error.code, error_codes::TASK_NOT_FOUND);

            let cancel = handler
                .handle_cancel_task(CancelTaskRequest::new(&bogus))
                .await;
            assert!(!cancel.is_success());
        }

        assert_eq!(lock_entries(&handler).await, 0);
    }

    #[tokio::test]
    async fn test_settled_tasks_release_their_lock() {
        let handler = replying("done");
        let task = assert_ok!(send(&handler, Message::user("hi")).await);
        assert_eq!(lock_entries(&handler).await, 0);

        assert_err!(send(&handler, Message::user("more").with_task_id(&task.id)).await);
        assert_eq!(lock_entries(&handler).await, 0);

        let handler = weather();
        let waiting = assert_ok!(send(&handler, Message::user("weather?")).await);
        assert_eq!(lock_entries(&handler).await, 1);

        assert_ok!(
            handler
                .handle_cancel_task(CancelTaskRequest::new(&waiting.id))
                .await
                .into_result()
        );
        assert_eq!(lock_entries(&handler).await, 0);
    }

    #[tokio::test]
    async fn test_follow_up_to_task_in_progress() {
        let gate = Arc::new(Notify::new());
        let handler = RequestHandler::in_memory(Gated { gate: gate.clone() });

        let submitted = handler
            .handle_send_message(SendMessageRequest::new(Message::user("slow")).non_blocking())
            .await
            .into_result()
            .unwrap()
            .into_task()
            .unwrap();

        let follow_up = Message::user("are you done?")
            .with_task_id(&submitted.id)
            .with_context_id(submitted.context_id.clone().unwrap());
        let error = assert_err!(send(&handler, follow_up).await);
        assert_eq!(error.code, error_codes::INVALID_PARAMS);

        gate.notify_one();
        tokio::time::sleep(Duration::from_millis(50)).await;

        let stored = handler.store().get(&submitted.id).await.unwrap().unwrap();
        assert_eq!(stored.state(), TaskState::Completed);
        assert_eq!(stored.history.len(), 2);
    }
}
