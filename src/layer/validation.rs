//! Validation layer for A2A protocol requests and responses

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use tower_layer::Layer;
use tower_service::Service;

use crate::{
    protocol::{
        error::A2AError, jsonrpc::JsonRpcResponse, message::Part, operation::A2AOperation,
        task::Task,
    },
    service::{A2ARequest, A2AResponse},
};

/// Layer that validates A2A protocol requests and responses
#[derive(Clone, Debug, Default)]
pub struct A2AValidationLayer;

impl A2AValidationLayer {
    /// Create a new validation layer
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for A2AValidationLayer {
    type Service = A2AValidationService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        A2AValidationService { inner }
    }
}

/// Validation service that wraps an inner service
#[derive(Clone)]
pub struct A2AValidationService<S> {
    inner: S,
}

impl<S> A2AValidationService<S> {
    /// Validate an A2A request
    fn validate_request(req: &A2ARequest) -> Result<(), A2AError> {
        match &req.operation {
            A2AOperation::SendMessage(send) => {
                let message = &send.params.message;

                if message.message_id.is_empty() {
                    return Err(A2AError::Validation("Message ID cannot be empty".into()));
                }

                if message.parts.is_empty() {
                    return Err(A2AError::Validation(
                        "Message must have at least one part".into(),
                    ));
                }

                for part in &message.parts {
                    match part {
                        Part::Text { text } if text.is_empty() => {
                            return Err(A2AError::Validation("Text part cannot be empty".into()));
                        }
                        Part::File { file } if file.uri.is_none() && file.bytes.is_none() => {
                            return Err(A2AError::Validation(
                                "File must have either URI or bytes content".into(),
                            ));
                        }
                        _ => {}
                    }
                }

                if matches!(message.task_id.as_deref(), Some("")) {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::GetTask(get) => {
                if get.params.id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
            A2AOperation::CancelTask(cancel) => {
                if cancel.params.id.is_empty() {
                    return Err(A2AError::Validation("Task ID cannot be empty".into()));
                }
            }
        }

        if req.context.agent_url.is_empty() {
            return Err(A2AError::Validation("Agent URL cannot be empty".into()));
        }

        Ok(())
    }

    fn validate_task(task: &Task) -> Result<(), A2AError> {
        if task.id.is_empty() {
            return Err(A2AError::Validation("Task ID cannot be empty".into()));
        }
        Ok(())
    }

    /// Validate an A2A response
    ///
    /// Error envelopes pass through untouched; only success payloads are checked.
    fn validate_response(resp: &A2AResponse) -> Result<(), A2AError> {
        match resp {
            A2AResponse::SendMessage(envelope) => {
                if let JsonRpcResponse::Success(success) = envelope.as_ref() {
                    if let Some(task) = success.result.as_task() {
                        Self::validate_task(task)?;
                    }
                }
            }
            A2AResponse::GetTask(envelope) | A2AResponse::CancelTask(envelope) => {
                if let JsonRpcResponse::Success(success) = envelope.as_ref() {
                    Self::validate_task(&success.result)?;
                }
            }
        }

        Ok(())
    }
}

impl<S> Service<A2ARequest> for A2AValidationService<S>
where
    S: Service<A2ARequest, Response = A2AResponse, Error = A2AError> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = A2AResponse;
    type Error = A2AError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: A2ARequest) -> Self::Future {
        if let Err(e) = Self::validate_request(&req) {
            return Box::pin(async move { Err(e) });
        }

        let mut inner = self.inner.clone();
        Box::pin(async move {
            let response = inner.call(req).await?;
            Self::validate_response(&response)?;
            Ok(response)
        })
    }
}
