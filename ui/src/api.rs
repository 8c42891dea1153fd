//! API client for the playground backend

use futures::StreamExt;
use gloo_net::eventsource::futures::{EventSource, EventSourceSubscription};
use gloo_net::http::Request;

use crate::error::PlaygroundError;
use crate::types::*;

const API_BASE: &str = "/api";

/// Fetch the agent directory
pub async fn list_agents() -> Result<Vec<Agent>, PlaygroundError> {
    let url = format!("{}/agents", API_BASE);
    fetch_json::<Vec<Agent>>(&url).await
}

/// Fetch an agent's configuration schema
pub async fn get_agent_schema(agent_id: &str) -> Result<ObjectSchema, PlaygroundError> {
    let url = format!("{}/agents/{}/schema", API_BASE, urlencoding::encode(agent_id));
    let response = Request::get(&url)
        .send()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Request failed: {}", e)))?;

    if response.status() == 404 {
        return Err(PlaygroundError::SchemaNotFound(agent_id.to_string()));
    }

    let schema_response: SchemaResponse = response
        .json()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Failed to parse response: {}", e)))?;

    match schema_response.data {
        Some(data) => Ok(data.config_schema),
        None => Err(PlaygroundError::Transport(schema_response.result_msg)),
    }
}

/// Persist an agent's configuration
pub async fn save_agent_config(agent_id: &str, config: &AgentConfig) -> Result<(), PlaygroundError> {
    let url = format!("{}/agents/{}/config", API_BASE, urlencoding::encode(agent_id));
    let response = Request::put(&url)
        .json(config)
        .map_err(|e| PlaygroundError::SaveFailed(format!("Failed to serialize body: {}", e)))?
        .send()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Request failed: {}", e)))?;

    let api_response: ApiResponse<()> = response
        .json()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Failed to parse response: {}", e)))?;

    if api_response.success {
        Ok(())
    } else {
        Err(PlaygroundError::SaveFailed(
            api_response.error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}

// ============================================================================
// Reply Streaming
// ============================================================================

/// Open the SSE stream carrying the agent's reply to `prompt`
pub fn stream_reply(prompt: &str) -> Result<ReplyStream, PlaygroundError> {
    let url = format!("{}/chat/stream?prompt={}", API_BASE, urlencoding::encode(prompt));
    let mut source = EventSource::new(&url)
        .map_err(|e| PlaygroundError::Transport(format!("Failed to open stream: {}", e)))?;
    let subscription = source
        .subscribe("message")
        .map_err(|e| PlaygroundError::Transport(format!("Failed to subscribe: {}", e)))?;

    Ok(ReplyStream {
        source: Some(source),
        subscription,
    })
}

/// Reply events in arrival order; the connection closes after `Done` or an error
pub struct ReplyStream {
    // Dropping the source closes the connection
    source: Option<EventSource>,
    subscription: EventSourceSubscription,
}

impl ReplyStream {
    /// Next event, or `None` once the stream has finished
    pub async fn next_event(&mut self) -> Option<Result<ReplyEvent, PlaygroundError>> {
        self.source.as_ref()?;

        let result = match self.subscription.next().await {
            Some(Ok((_, message))) => {
                let data = message.data().as_string().unwrap_or_default();
                serde_json::from_str::<ReplyEvent>(&data).map_err(|e| {
                    PlaygroundError::Transport(format!("Invalid stream event: {}", e))
                })
            }
            Some(Err(e)) => Err(PlaygroundError::Transport(format!("Stream failed: {:?}", e))),
            None => Err(PlaygroundError::Transport(
                "Stream ended before completion".to_string(),
            )),
        };

        if matches!(result, Ok(ReplyEvent::Done) | Err(_)) {
            self.source.take();
        }
        Some(result)
    }
}

// ============================================================================
// Helpers
// ============================================================================

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, PlaygroundError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Request failed: {}", e)))?;

    let api_response: ApiResponse<T> = response
        .json()
        .await
        .map_err(|e| PlaygroundError::Transport(format!("Failed to parse response: {}", e)))?;

    if api_response.success {
        api_response
            .data
            .ok_or_else(|| PlaygroundError::Transport("No data in response".to_string()))
    } else {
        Err(PlaygroundError::Transport(
            api_response.error.unwrap_or_else(|| "Unknown error".to_string()),
        ))
    }
}
