//! HTTP + SSE transport implementation.
//!
//! Implements the MCP 2024-11-05 HTTP+SSE binding. A client opens an event
//! stream with `GET /sse`, reads its message endpoint from the first event,
//! then posts JSON-RPC requests to that endpoint. Responses arrive on the
//! stream as `message` events; the POST itself only gets `202 Accepted`.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{RawQuery, State},
    middleware,
    response::{
        IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt, future, stream};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Map, json};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, instrument, warn};

use super::config::SseConfig;
use super::error::GatewayError;
use super::jsonrpc::{JsonRpcRequest, dispatch};
use super::session::{SessionId, SessionTable};
use super::{TransportError, TransportResult};
use crate::core::McpServer;
use crate::core::security::{AuthConfig, require_bearer};

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// HTTP + SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
    auth: Option<AuthConfig>,
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
struct AppState {
    server: McpServer,
    sessions: SessionTable,
    sse_path: Arc<str>,
    message_path: Arc<str>,
}

impl SseTransport {
    /// Create a new SSE transport. `auth` of `None` leaves every route public.
    pub fn new(config: SseConfig, auth: Option<AuthConfig>) -> Self {
        Self { config, auth }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the SSE transport until Ctrl-C.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let tools = server.registry().tool_names().join(", ");

        let sessions = SessionTable::new();
        let app = build_router(server, &self.config, self.auth.clone(), sessions.clone());

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (HTTP+SSE, CORS {})", addr, cors_status);
        info!("  → SSE:      GET {}", self.config.sse_path);
        info!("  → Messages: POST {}/?session_id=<id>", self.config.message_path);
        info!("  → Health:   GET /health");
        match &self.auth {
            Some(_) => info!("Authentication: Bearer token required (except /health)"),
            None => warn!("Authentication disabled - every endpoint is public"),
        }
        info!("Tools: {}", tools);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(sessions))
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        info!("SSE transport finished");
        Ok(())
    }
}

/// Build the HTTP router.
///
/// The auth filter wraps every route including the fallback, so unknown
/// paths are rejected with 401 before they can 404.
pub fn build_router(
    server: McpServer,
    config: &SseConfig,
    auth: Option<AuthConfig>,
    sessions: SessionTable,
) -> Router {
    let state = AppState {
        server,
        sessions,
        sse_path: Arc::from(config.sse_path.as_str()),
        message_path: Arc::from(config.message_path.as_str()),
    };

    let mut app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route(&config.sse_path, get(open_stream))
        .route(&config.message_path, post(post_message))
        .route(&format!("{}/", config.message_path), post(post_message))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state);

    if let Some(auth) = auth {
        app = app.layer(middleware::from_fn_with_state(auth, require_bearer));
    }

    if config.enable_cors {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
        app = app.layer(cors);
    }

    app.layer(TraceLayer::new_for_http())
}

/// Resolves on Ctrl-C. Open streams are ended first so the graceful
/// shutdown does not wait on them forever.
async fn shutdown_signal(sessions: SessionTable) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        future::pending::<()>().await;
    }
    let closed = sessions.close_all();
    info!("Shutdown requested - closed {} open session(s)", closed);
}

/// Root handler - provides server info.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    let server = &state.server;
    let profile = server.profile();

    let mut endpoints = Map::new();
    endpoints.insert("/".into(), json!("Server information (this page)"));
    endpoints.insert(
        state.sse_path.to_string(),
        json!("SSE connection endpoint (GET) - opens an MCP session"),
    );
    endpoints.insert(
        state.message_path.to_string(),
        json!("Message endpoint (POST) - sends MCP messages"),
    );
    endpoints.insert("/health".into(), json!("Health check (GET)"));

    Json(json!({
        "name": server.name(),
        "version": server.version(),
        "description": profile.description(),
        "endpoints": endpoints,
        "tools": server.registry().summaries(),
        "usage": profile.usage(),
    }))
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "server": state.server.name(),
        "version": state.server.version(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" })))
}

async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method Not Allowed" })),
    )
}

/// Open a session and stream its responses.
#[instrument(skip_all, fields(session_id))]
async fn open_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, session) = state.sessions.open();
    tracing::Span::current().record("session_id", tracing::field::display(id));
    info!("SSE stream opened ({} active)", state.sessions.len());

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}/?session_id={}", state.message_path, id));

    let messages = session.filter_map(|response| {
        let event = Event::default()
            .event("message")
            .json_data(&response)
            .inspect_err(|e| warn!("Dropping response that failed to encode: {}", e))
            .ok();
        future::ready(event)
    });

    let events = stream::once(future::ready(endpoint))
        .chain(messages)
        .map(Ok::<_, Infallible>);

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(KEEP_ALIVE_INTERVAL)
            .text("keep-alive"),
    )
}

#[derive(Debug, Default, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

/// Accept a JSON-RPC message for an open session.
#[instrument(skip_all, fields(session_id))]
async fn post_message(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    body: Bytes,
) -> Result<impl IntoResponse, GatewayError> {
    let query: MessageQuery =
        serde_urlencoded::from_str(query.as_deref().unwrap_or_default()).unwrap_or_default();

    let raw = query
        .session_id
        .filter(|s| !s.is_empty())
        .ok_or(GatewayError::MissingSessionId)?;
    tracing::Span::current().record("session_id", raw.as_str());

    let id: SessionId = raw
        .parse()
        .map_err(|_| GatewayError::InvalidSessionId(raw.clone()))?;

    if !state.sessions.contains(&id) {
        return Err(GatewayError::UnknownSession(raw));
    }

    let request: JsonRpcRequest =
        serde_json::from_slice(&body).map_err(GatewayError::InvalidMessage)?;
    info!("Received JSON-RPC message: {}", request.method);

    if let Some(response) = dispatch(&state.server, request) {
        state.sessions.deliver(&id, response)?;
    }

    Ok((StatusCode::ACCEPTED, "Accepted"))
}
