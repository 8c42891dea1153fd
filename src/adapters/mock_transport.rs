//! Mocked agent transport with fixed network delays
//!
//! Schemas come from the [`AgentDirectory`], saves are kept in memory and
//! replies are a fixed text streamed word by word at a fixed cadence.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

use crate::config::TransportSettings;
use crate::directory::AgentDirectory;
use crate::domain::{Agent, AgentTransport, ConfigMap, ReplyEvent, ReplyStream};
use crate::error::{PlaygroundError, PlaygroundResult};

/// Capacity of the channel between the streaming task and its consumer
const REPLY_BUFFER: usize = 16;

pub struct MockAgentTransport {
    directory: Arc<AgentDirectory>,
    settings: TransportSettings,
    saved: RwLock<HashMap<String, ConfigMap>>,
}

impl MockAgentTransport {
    pub fn new(directory: Arc<AgentDirectory>, settings: TransportSettings) -> Self {
        Self {
            directory,
            settings,
            saved: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AgentTransport for MockAgentTransport {
    fn list_agents(&self) -> Vec<Agent> {
        self.directory.agents()
    }

    async fn fetch_schema(&self, agent_id: &str) -> PlaygroundResult<Value> {
        info!("Fetching schema for agent: {}", agent_id);
        tokio::time::sleep(Duration::from_millis(self.settings.schema_delay_ms)).await;

        self.directory
            .schema(agent_id)
            .cloned()
            .ok_or_else(|| PlaygroundError::SchemaNotFound(agent_id.to_string()))
    }

    async fn save_config(&self, agent_id: &str, config: ConfigMap) -> PlaygroundResult<()> {
        info!("Updating config for agent: {} ({} fields)", agent_id, config.len());
        tokio::time::sleep(Duration::from_millis(self.settings.save_delay_ms)).await;

        self.saved.write().await.insert(agent_id.to_string(), config);
        info!("Config saved successfully for agent: {}", agent_id);
        Ok(())
    }

    async fn load_config(&self, agent_id: &str) -> PlaygroundResult<Option<ConfigMap>> {
        Ok(self.saved.read().await.get(agent_id).cloned())
    }

    async fn stream_reply(&self, prompt: &str) -> PlaygroundResult<ReplyStream> {
        let stream_id = uuid::Uuid::new_v4();
        info!("Streaming response {} for message: {:?}", stream_id, prompt);

        let chunks = split_reply(&self.settings.reply_text);
        let cadence = Duration::from_millis(self.settings.chunk_interval_ms);
        let (tx, rx) = mpsc::channel(REPLY_BUFFER);

        tokio::spawn(async move {
            for text in chunks {
                tokio::time::sleep(cadence).await;
                if tx.send(ReplyEvent::Chunk { text }).await.is_err() {
                    debug!("Reply stream {} dropped by consumer", stream_id);
                    return;
                }
            }
            // Completion follows the last chunk by one tick
            tokio::time::sleep(cadence).await;
            if tx.send(ReplyEvent::Done).await.is_err() {
                debug!("Reply stream {} dropped by consumer before completion", stream_id);
                return;
            }
            debug!("Reply stream {} complete", stream_id);
        });

        Ok(rx)
    }
}

/// Splits a reply into word fragments whose concatenation is the full text.
///
/// Every fragment but the last keeps its trailing space; empty fragments are dropped.
pub fn split_reply(text: &str) -> Vec<String> {
    let words: Vec<&str> = text.split(' ').collect();
    let last = words.len() - 1;

    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            if i == last {
                word.to_string()
            } else {
                format!("{} ", word)
            }
        })
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::STORYTELLER_AGENT_ID;
    use serde_json::json;

    fn transport(reply_text: &str) -> MockAgentTransport {
        MockAgentTransport::new(
            Arc::new(AgentDirectory::builtin()),
            TransportSettings {
                reply_text: reply_text.to_string(),
                ..TransportSettings::default()
            },
        )
    }

    async fn drain(mut rx: ReplyStream) -> Vec<ReplyEvent> {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_split_reply_concatenates_to_text() {
        let text = "Hi there, how are you?";
        let chunks = split_reply(text);
        assert_eq!(chunks, ["Hi ", "there, ", "how ", "are ", "you?"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_reply_never_yields_empty_fragments() {
        assert!(split_reply("").is_empty());
        let chunks = split_reply("trailing space ");
        assert_eq!(chunks, ["trailing ", "space "]);
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_schema_known_agent() {
        let transport = transport("ok");
        let schema = transport.fetch_schema(STORYTELLER_AGENT_ID).await.unwrap();
        assert_eq!(schema["title"], "Storyteller Agent Config");
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_schema_unknown_agent() {
        let transport = transport("ok");
        let err = transport.fetch_schema("missing").await.unwrap_err();
        assert!(matches!(err, PlaygroundError::SchemaNotFound(id) if id == "missing"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_schema_waits_for_delay() {
        let transport = transport("ok");
        let started = tokio::time::Instant::now();
        transport.fetch_schema(STORYTELLER_AGENT_ID).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_then_load_config() {
        let transport = transport("ok");
        assert!(transport.load_config("a").await.unwrap().is_none());

        let config = json!({"genre": "Comedy", "creativity": 0.5})
            .as_object()
            .cloned()
            .unwrap();
        transport.save_config("a", config.clone()).await.unwrap();

        assert_eq!(transport.load_config("a").await.unwrap(), Some(config));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_delivers_chunks_in_order_then_done() {
        let transport = transport("Hi there");
        let rx = transport.stream_reply("Hello").await.unwrap();
        let events = drain(rx).await;

        assert_eq!(
            events,
            vec![
                ReplyEvent::Chunk {
                    text: "Hi ".to_string()
                },
                ReplyEvent::Chunk {
                    text: "there".to_string()
                },
                ReplyEvent::Done,
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_cadence() {
        let transport = transport("one two three");
        let started = tokio::time::Instant::now();
        let events = drain(transport.stream_reply("go").await.unwrap()).await;

        assert_eq!(events.len(), 4);
        // Three chunks plus the completion tick
        assert!(started.elapsed() >= Duration::from_millis(4 * 80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_stops_when_consumer_drops() {
        let transport = transport("a b c d e f");
        let mut rx = transport.stream_reply("go").await.unwrap();
        let first = rx.recv().await;
        assert!(matches!(first, Some(ReplyEvent::Chunk { .. })));
        drop(rx);
        // The producer task must wind down without panicking
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_stream_consumer_dropped_before_done() {
        let transport = transport("a");
        let mut rx = transport.stream_reply("go").await.unwrap();
        assert_eq!(
            rx.recv().await,
            Some(ReplyEvent::Chunk {
                text: "a".to_string()
            })
        );
        // Every chunk arrived; only the completion event is left undelivered
        drop(rx);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}
