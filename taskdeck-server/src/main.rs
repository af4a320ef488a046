//! taskdeck REST server: kanban boards over an in-memory document store.

mod api;
mod auth;
mod config;
mod state;
mod store;

use tower_http::cors::{Any, CorsLayer};

use crate::api::api_router;
use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ServerConfig::from_env();
    let state = AppState::new();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = api_router().layer(cors).with_state(state);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.bind_address, config.port)).await?;
    log::info!(
        "HTTP server listening on http://{}:{}",
        config.bind_address,
        config.port
    );

    axum::serve(listener, app).await?;
    Ok(())
}
