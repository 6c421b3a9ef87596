//! # A2A Bridge
//!
//! A Tower-based adapter between conversational agents and the Agent2Agent (A2A) protocol.
//!
//! The client half resolves agent cards, binds to the transport an agent advertises and
//! drives JSON-RPC conversations with it. The server half turns any [`server::AgentRuntime`]
//! into an A2A agent with a tracked task lifecycle.
//!
//! ## Example
//!
//! ```rust,no_run
//! use a2a_bridge::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let base: url::Url = "http://localhost:8080".parse()?;
//!     let card = CardResolver::new().resolve(&base).await?;
//!     println!("{}", card.render());
//!
//!     let client = A2AClientBuilder::from_card(&card, ClientConfig::new(base.as_str()))?
//!         .build()?;
//!     let mut driver = Driver::new(client);
//!     let outcome = driver.single_turn("hello").await?;
//!     println!("{:?}", outcome.snapshot.map(|task| task.state()));
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod codec;
pub mod layer;
pub mod protocol;
pub mod server;
pub mod service;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        client::{A2AClientBuilder, AgentClient, CardResolver, ClientConfig, Driver},
        protocol::error::{A2AError, A2AResult},
        protocol::{
            AgentCard, AgentSkill, AgentTransport, CancelTaskRequest, GetTaskRequest, Message,
            Part, Role, SendMessageRequest, SendMessageResult, Task, TaskState, TransportKind,
        },
        server::{
            A2AServer, AgentOutcome, AgentRuntime, RequestHandler, RuntimeError, ServerConfig,
        },
    };
}
