//! High-level client API for A2A protocol

pub mod agent;
pub mod builder;
pub mod config;
pub mod driver;
pub mod resolver;

pub use agent::AgentClient;
pub use builder::{A2AClientBuilder, HttpAgentClient, LayeredClient};
pub use config::ClientConfig;
pub use driver::{Driver, MultiTurn, SingleTurn};
pub use resolver::CardResolver;
