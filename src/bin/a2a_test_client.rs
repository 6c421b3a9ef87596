//! Exercise a running A2A agent with a single-turn and a multi-turn conversation

use std::{process::ExitCode, time::Duration};

use a2a_bridge::{
    client::{MultiTurn, SingleTurn},
    prelude::*,
};
use clap::Parser;
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

const SINGLE_TURN_TEXT: &str = "what is the weather in new york";
const FIRST_TURN_TEXT: &str = "what is the time in new york";
const SECOND_TURN_TEXT: &str = " is the same time in hoboken NJ";

#[derive(Parser, Debug)]
#[command(
    name = "a2a-test-client",
    about = "Run single-turn and multi-turn conversations against an A2A agent",
    version
)]
struct Args {
    /// Base URL of the agent
    #[arg(long, env = "AGENT_URL", default_value = "http://localhost:8080")]
    agent_url: Url,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Test client failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), A2AError> {
    let timeout = Duration::from_secs(args.timeout_secs);

    info!("--- Connecting to agent at {}... ---", args.agent_url);
    let card = CardResolver::with_timeout(timeout)?
        .resolve(&args.agent_url)
        .await?;

    let config = ClientConfig::new(args.agent_url.as_str()).with_timeout(timeout);
    let client = A2AClientBuilder::from_card(&card, config)?.build()?;
    info!("--- Connected to {} ---", card.name);

    let mut driver = Driver::new(client);

    info!("--- Single Turn Request ---");
    match driver.single_turn(SINGLE_TURN_TEXT).await {
        Ok(SingleTurn { result, snapshot }) => {
            log_json("Single Turn Response", &result);
            match snapshot {
                Some(task) => log_json("Query Task Response", &task),
                None => warn!("Received non-task response, skipping task query"),
            }
        }
        Err(A2AError::Rejected(e)) => warn!("Single turn rejected by agent: {}", e),
        Err(e) => return Err(e),
    }

    info!("--- Multi-Turn Request ---");
    match driver.multi_turn(FIRST_TURN_TEXT, SECOND_TURN_TEXT).await {
        Ok(MultiTurn { first, follow_up }) => {
            log_json("Multi-Turn: First Turn Response", &first);
            match follow_up {
                Some(second) => log_json("Multi-Turn: Second Turn Response", &second),
                None => info!("First turn completed, no further input required"),
            }
        }
        Err(A2AError::Rejected(e)) => warn!("Multi turn rejected by agent: {}", e),
        Err(e) => return Err(e),
    }

    Ok(())
}

fn log_json<T: Serialize>(description: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => info!("--- {} ---\n{}", description, json),
        Err(e) => warn!("--- {} --- (unserializable: {})", description, e),
    }
}
