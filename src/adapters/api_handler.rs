//! REST and SSE handlers used by the Web UI
//!
//! Exposes the agent directory, schema retrieval, configuration persistence
//! and the streamed chat reply.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;

use crate::domain::{Agent, AgentTransport, ConfigMap, ReplyEvent, SchemaResponse};
use crate::error::PlaygroundError;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct ApiState {
    pub transport: Arc<dyn AgentTransport>,
}

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }
}

#[derive(Deserialize)]
pub struct StreamQuery {
    pub prompt: String,
}

// ============================================================================
// Agents
// ============================================================================

pub async fn list_agents(State(state): State<ApiState>) -> Json<ApiResponse<Vec<Agent>>> {
    Json(ApiResponse::success(state.transport.list_agents()))
}

pub async fn get_agent_schema(
    State(state): State<ApiState>,
    Path(agent_id): Path<String>,
) -> impl IntoResponse {
    match state.transport.fetch_schema(&agent_id).await {
        Ok(schema) => (StatusCode::OK, Json(SchemaResponse::success(agent_id, schema))),
        Err(PlaygroundError::SchemaNotFound(_)) => {
            tracing::warn!("Schema requested for unknown agent: {}", agent_id);
            (StatusCode::NOT_FOUND, Json(SchemaResponse::not_found()))
        }
        Err(e) => {
            tracing::error!("Failed to fetch schema for {}: {}", agent_id, e);
            let mut response = SchemaResponse::not_found();
            response.result_code = "ERROR".to_string();
            response.result_msg = e.to_string();
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
        }
    }
}

pub async fn update_agent_config(
    State(state): State<ApiState>,
    Path(agent_id): Path<String>,
    Json(config): Json<ConfigMap>,
) -> impl IntoResponse {
    match state.transport.save_config(&agent_id, config).await {
        Ok(()) => (StatusCode::OK, Json(ApiResponse::ok())),
        Err(e) => {
            tracing::error!("Failed to save config: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        }
    }
}

pub async fn get_agent_config(
    State(state): State<ApiState>,
    Path(agent_id): Path<String>,
) -> impl IntoResponse {
    match state.transport.load_config(&agent_id).await {
        Ok(Some(config)) => (StatusCode::OK, Json(ApiResponse::success(config))),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!(
                "No saved config for agent: {}",
                agent_id
            ))),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::error(e.to_string())),
        ),
    }
}

// ============================================================================
// Chat
// ============================================================================

/// Streams the agent reply as SSE `message` events carrying [`ReplyEvent`] JSON
pub async fn stream_chat(
    State(state): State<ApiState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, Json<ApiResponse<()>>)>
{
    let receiver = state
        .transport
        .stream_reply(&query.prompt)
        .await
        .map_err(|e| {
            tracing::error!("Failed to start reply stream: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(e.to_string())),
            )
        })?;

    let stream = ReceiverStream::new(receiver).map(|event: ReplyEvent| {
        let data = serde_json::to_string(&event).unwrap_or_default();
        Ok(Event::default().data(data))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
