//! Development server for the built site.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::reload::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// Destination root to serve.
    pub root: PathBuf,

    /// Host to bind to. Local-only by default; the server is not meant to
    /// be externally reachable.
    pub host: String,

    /// Port to listen on.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist"),
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("Invalid bind address {0}: {1}")]
    AddrError(String, String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),
}

/// Shared server state.
struct ServerState {
    root: PathBuf,
    hub: ReloadHub,
}

/// Development server rooted at the destination directory.
///
/// Serves the compiled asset subtrees through `ServeDir`, injects the reload
/// client into root-level HTML pages, and forwards hub messages over the
/// `/__reload` WebSocket. Does not open a browser.
pub struct DevServer {
    config: ServeConfig,
    hub: ReloadHub,
}

impl DevServer {
    pub fn new(config: ServeConfig, hub: ReloadHub) -> Self {
        Self { config, hub }
    }

    /// Start the server and serve until the process ends.
    pub async fn start(self) -> Result<(), ServeError> {
        let raw_addr = format!("{}:{}", self.config.host, self.config.port);
        let addr: SocketAddr = raw_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| ServeError::AddrError(raw_addr, e.to_string()))?;

        let state = Arc::new(ServerState {
            root: self.config.root.clone(),
            hub: self.hub,
        });

        let app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(script_handler))
            .nest_service("/css", ServeDir::new(self.config.root.join("css")))
            .nest_service("/js", ServeDir::new(self.config.root.join("js")))
            .nest_service("/images", ServeDir::new(self.config.root.join("images")))
            .fallback(get(page_handler))
            .with_state(state);

        tracing::info!("Serving {} at http://{}", self.config.root.display(), addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServeError::BindError(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServeError::BindError(addr, e.to_string()))?;

        Ok(())
    }
}

/// Handler for root-level pages and files.
///
/// Only single-segment names exist at the destination root by construction;
/// anything else is not found. HTML responses get the reload client
/// injected.
async fn page_handler(State(state): State<Arc<ServerState>>, uri: Uri) -> Response {
    let raw = uri.path().trim_start_matches('/');
    let name = if raw.is_empty() { "index.html" } else { raw };

    if name.contains('/') || name.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let path = state.root.join(name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(_) => return StatusCode::NOT_FOUND.into_response(),
    };

    if name.ends_with(".html") {
        let html = inject_reload_snippet(&String::from_utf8_lossy(&bytes));
        Html(html).into_response()
    } else if name.ends_with(".txt") {
        ([("content-type", "text/plain; charset=utf-8")], bytes).into_response()
    } else {
        ([("content-type", "application/octet-stream")], bytes).into_response()
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Forward hub messages to one connected client.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    let msg = match serde_json::to_string(&ReloadMessage::Connected) {
        Ok(msg) => msg,
        Err(_) => return,
    };
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let json = match serde_json::to_string(&reload_msg) {
            Ok(json) => json,
            Err(_) => continue,
        };
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn script_handler() -> impl IntoResponse {
    (
        [("content-type", "application/javascript")],
        reload_client_script(),
    )
}

/// Insert the reload client into a served page.
fn inject_reload_snippet(html: &str) -> String {
    const SNIPPET: &str = r#"<script src="/__reload.js"></script>"#;

    if let Some(index) = html.rfind("</body>") {
        let mut out = String::with_capacity(html.len() + SNIPPET.len());
        out.push_str(&html[..index]);
        out.push_str(SNIPPET);
        out.push_str(&html[index..]);
        out
    } else {
        format!("{html}{SNIPPET}")
    }
}
