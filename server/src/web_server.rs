use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    extract::{State, WebSocketUpgrade},
    response::IntoResponse,
    routing::{get, post},
};
use common::games::tictactoe::TicTacToeSettings;
use common::log;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::contact::{ContactRelay, handle_contact, handle_contact_wrong_method};
use crate::site_config::SiteConfig;
use crate::ws_handler::handle_websocket;

#[derive(Clone)]
pub struct WebServerState {
    pub contact_relay: Arc<ContactRelay>,
    pub game_settings: Arc<TicTacToeSettings>,
}

impl WebServerState {
    pub fn from_config(config: &SiteConfig) -> Result<Self, String> {
        Ok(Self {
            contact_relay: Arc::new(ContactRelay::new(config.contact.clone())?),
            game_settings: Arc::new(config.tictactoe.clone()),
        })
    }
}

pub fn build_router(state: WebServerState, static_files_path: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/contact",
            post(handle_contact).get(handle_contact_wrong_method),
        )
        .route("/ws/tictactoe", get(ws_upgrade_handler))
        .fallback_service(ServeDir::new(static_files_path))
        .layer(cors)
        .with_state(state)
}

pub async fn run_web_server(config: SiteConfig) -> Result<(), String> {
    let state = WebServerState::from_config(&config)?;
    if !state.contact_relay.is_configured() {
        log!("Contact webhook is not configured; /api/contact will answer 500");
    }

    let app = build_router(state, Path::new(&config.static_files_path));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| format!("Failed to bind {}: {}", config.bind_address, e))?;
    log!(
        "Web server listening on {}, serving {}",
        config.bind_address,
        config.static_files_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Web server error: {}", e))?;

    log!("Web server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        common::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log!("Shutdown signal received");
}

async fn ws_upgrade_handler(
    ws: WebSocketUpgrade,
    State(state): State<WebServerState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}
