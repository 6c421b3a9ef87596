//! Server side of the A2A protocol: turns an [`AgentRuntime`] into a network agent

pub mod app;
pub mod handler;
pub mod runtime;
pub mod store;

pub use app::{A2AServer, ServerConfig};
pub use handler::RequestHandler;
pub use runtime::{AgentOutcome, AgentRuntime, RuntimeError};
pub use store::{InMemoryTaskStore, TaskStore};
