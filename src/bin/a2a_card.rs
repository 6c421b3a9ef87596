//! Fetch and display the agent cards published by one or more A2A agents

use std::time::Duration;

use a2a_bridge::prelude::*;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "a2a-card", about = "Display the agent cards of A2A agents", version)]
struct Args {
    /// Base URLs of the agents to query; an invalid one is reported like any other failure
    #[arg(default_values = [
        "http://localhost:8081",
        "http://localhost:8082",
        "http://localhost:8083",
        "http://localhost:8084",
    ])]
    urls: Vec<String>,

    /// Seconds to wait for each agent
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let resolver = match CardResolver::with_timeout(Duration::from_secs(args.timeout_secs)) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Failed to set up HTTP client: {}", e);
            return;
        }
    };

    for url in &args.urls {
        info!("--- Fetching agent card from {} ---", url);
    }

    let results = resolver.resolve_targets(&args.urls).await;
    for (url, result) in args.urls.iter().zip(results) {
        match result {
            Ok(card) => info!("Agent card from {}:\n{}", url, card.render()),
            Err(e) if e.is_unreachable() => {
                error!("Could not reach agent at {}: {}", url, e)
            }
            Err(e @ A2AError::Validation(_)) => error!("Skipping {}: {}", url, e),
            Err(e) => error!("Invalid agent card from {}: {}", url, e),
        }
    }
}
