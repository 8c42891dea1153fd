//! # Agent Playground
//!
//! Backend for a browser playground that configures a single conversational
//! agent and chats with it. The agent side is mocked: schemas come from a
//! static directory, saves are kept in memory and replies are streamed with
//! fixed delays.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agent_playground::config::Settings;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::new()?;
//!     println!("listening on {}:{}", settings.server.host, settings.server.port);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: agent types, reply events and the [`domain::AgentTransport`] port
//! - **Directory**: read-only agent table injected at startup
//! - **Adapters**: mock transport, REST/SSE handlers, static UI serving
//! - **Config**: configuration loading and validation

pub mod adapters;
pub mod cli;
pub mod config;
pub mod directory;
pub mod domain;
pub mod error;

use crate::adapters::api_handler::{self, ApiState};
use crate::adapters::health_handler::HealthHandler;
use crate::domain::AgentTransport;
use axum::{
    routing::{get, put},
    Router,
};
use std::path::Path;
use std::sync::Arc;

/// Creates the Axum application router with all endpoints configured.
///
/// # Arguments
///
/// * `transport` - Agent transport backing the API
/// * `ui_dir` - Directory of the built web UI, served for all non-API paths
pub fn create_app(transport: Arc<dyn AgentTransport>, ui_dir: &Path) -> Router {
    let health_handler = Arc::new(HealthHandler::new(transport.clone()));

    let health_router = Router::new()
        .route("/health", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.health().await }
            }
        }))
        .route("/health/live", get({
            let handler = health_handler.clone();
            move || {
                let h = handler.clone();
                async move { h.live().await }
            }
        }));

    let api_router = Router::new()
        .route("/agents", get(api_handler::list_agents))
        .route("/agents/:id/schema", get(api_handler::get_agent_schema))
        .route(
            "/agents/:id/config",
            put(api_handler::update_agent_config).get(api_handler::get_agent_config),
        )
        .route("/chat/stream", get(api_handler::stream_chat))
        .with_state(ApiState { transport });

    health_router
        .nest("/api", api_router)
        .fallback_service(adapters::ui_handler::spa_service(ui_dir))
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
}
