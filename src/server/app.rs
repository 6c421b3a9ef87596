//! HTTP surface of an A2A agent, powered by axum
//!
//! Serves:
//! - `GET  /.well-known/agent-card.json` (and the legacy `/.well-known/agent.json`)
//! - `POST /` JSON-RPC 2.0 endpoint
//! - `GET  /health`

use std::{future::Future, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::OnceCell};
use tracing::info;
use url::Url;

use crate::{
    protocol::{
        agent::{
            AgentCard, AgentTransport, TransportKind, AGENT_CARD_PATH, LEGACY_AGENT_CARD_PATH,
            PROTOCOL_VERSION,
        },
        error::A2AError,
    },
    server::handler::RequestHandler,
    transport::join_url,
};

/// Where the server is reachable and what it says about itself
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// URL clients use to reach this server
    pub public_url: Url,

    /// Card to publish; `url` and transports are filled from `public_url` when absent
    pub card: AgentCard,
}

impl ServerConfig {
    pub fn new(public_url: Url, card: AgentCard) -> Self {
        Self { public_url, card }
    }
}

#[derive(Clone)]
struct AppState {
    handler: RequestHandler,
    config: Arc<ServerConfig>,
    card: Arc<OnceCell<AgentCard>>,
}

/// An agent exposed over HTTP
pub struct A2AServer {
    state: AppState,
}

impl A2AServer {
    pub fn new(config: ServerConfig, handler: RequestHandler) -> Self {
        Self {
            state: AppState {
                handler,
                config: Arc::new(config),
                card: Arc::new(OnceCell::new()),
            },
        }
    }

    /// Build the axum router
    pub fn router(&self) -> Router {
        Router::new()
            .route(AGENT_CARD_PATH, get(get_agent_card))
            .route(LEGACY_AGENT_CARD_PATH, get(get_agent_card))
            .route("/", post(handle_jsonrpc))
            .route("/health", get(health_check))
            .with_state(self.state.clone())
    }

    /// Serve requests on `listener` until the process stops
    pub async fn serve(self, listener: TcpListener) -> Result<(), A2AError> {
        self.serve_with_shutdown(listener, std::future::pending())
            .await
    }

    /// Serve requests on `listener` until `signal` resolves
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        signal: F,
    ) -> Result<(), A2AError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if let Ok(addr) = listener.local_addr() {
            info!("A2A server listening on http://{}", addr);
        }
        info!(
            "   Agent Card: {}",
            join_url(&self.state.config.public_url, AGENT_CARD_PATH)
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| A2AError::Transport(format!("A2A server failed: {}", e)))
    }
}

/// Complete the configured card with the server's public endpoint
fn public_card(config: &ServerConfig) -> AgentCard {
    let mut card = config.card.clone();

    if card.url.is_empty() {
        card.url = config.public_url.to_string();
    }
    if card.transports.is_empty() {
        card.transports
            .push(AgentTransport::new(TransportKind::JsonRpc, card.url.clone()));
    }

    card
}

/// GET /.well-known/agent-card.json
async fn get_agent_card(State(state): State<AppState>) -> Json<AgentCard> {
    let card = state
        .card
        .get_or_init(|| async { public_card(&state.config) })
        .await;
    Json(card.clone())
}

/// POST / — JSON-RPC 2.0 endpoint
///
/// The raw body is taken so malformed JSON still gets a JSON-RPC parse error.
async fn handle_jsonrpc(State(state): State<AppState>, body: Bytes) -> Json<Value> {
    Json(state.handler.dispatch(&body).await)
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "agent": state.config.card.name,
        "protocolVersion": PROTOCOL_VERSION,
    }))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::server::runtime::{AgentOutcome, MockAgentRuntime};

    use super::*;

    fn server(card: AgentCard) -> A2AServer {
        let mut runtime = MockAgentRuntime::new();
        runtime
            .expect_advance()
            .returning(|_, _| Ok(AgentOutcome::reply("pong")));

        A2AServer::new(
            ServerConfig::new("http://127.0.0.1:18789/".parse().unwrap(), card),
            RequestHandler::in_memory(runtime),
        )
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn test_agent_card_is_completed_from_public_url() {
        let app = server(AgentCard::new("Pinger", "Answers ping", "")).router();
        let req = Request::builder()
            .uri(AGENT_CARD_PATH)
            .body(Body::empty())
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);

        let card: AgentCard = serde_json::from_value(body_json(resp).await).unwrap();
        assert_eq!(card.url, "http://127.0.0.1:18789/");
        assert_eq!(card.transports.len(), 1);
        assert_eq!(card.transports[0].kind(), TransportKind::JsonRpc);
    }

    #[tokio::test]
    async fn test_configured_card_url_is_kept() {
        let card = AgentCard::new("Pinger", "Answers ping", "https://ping.example/rpc");
        let app = server(card).router();
        let req = Request::builder()
            .uri(LEGACY_AGENT_CARD_PATH)
            .body(Body::empty())
            .expect("request");

        let card: AgentCard =
            serde_json::from_value(body_json(app.oneshot(req).await.expect("response")).await)
                .unwrap();
        assert_eq!(card.url, "https://ping.example/rpc");
        assert_eq!(card.transports[0].url, "https://ping.example/rpc");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = server(AgentCard::new("Pinger", "Answers ping", "")).router();
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_jsonrpc_parse_error() {
        let app = server(AgentCard::new("Pinger", "Answers ping", "")).router();
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from("{oops"))
            .expect("request");

        let resp = app.oneshot(req).await.expect("response");
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await["error"]["code"], -32700);
    }

    #[tokio::test]
    async fn test_jsonrpc_send_message() {
        let app = server(AgentCard::new("Pinger", "Answers ping", "")).router();
        let body = json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "messageId": "m-1",
                    "parts": [{"kind": "text", "text": "ping"}]
                }
            },
            "id": 1
        });

        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");

        let json = body_json(app.oneshot(req).await.expect("response")).await;
        assert_eq!(json["id"], 1);
        assert_eq!(json["result"]["status"]["state"], "completed");
        assert_eq!(json["result"]["status"]["message"]["parts"][0]["text"], "pong");
    }
}
