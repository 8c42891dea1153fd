use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::error::PlaygroundResult;

/// A selectable agent. Identity is `id`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: String,
    pub name: String,
}

/// Flat key/value configuration as it travels over the wire
pub type ConfigMap = Map<String, Value>;

/// One event of a streamed agent reply.
///
/// A stream is a finite sequence of `Chunk` events followed by exactly one
/// `Done`. The same shape is used as the SSE payload.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyEvent {
    Chunk { text: String },
    Done,
}

/// Receiving half of a reply stream, drained in order by the consumer
pub type ReplyStream = mpsc::Receiver<ReplyEvent>;

/// Envelope returned by the schema endpoint
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub result_code: String,
    pub result_msg: String,
    pub data: Option<SchemaData>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SchemaData {
    pub agent_id: String,
    pub config_schema: Value,
}

impl SchemaResponse {
    pub fn success(agent_id: impl Into<String>, config_schema: Value) -> Self {
        Self {
            result_code: "SUCCESS".to_string(),
            result_msg: "Schema retrieved successfully.".to_string(),
            data: Some(SchemaData {
                agent_id: agent_id.into(),
                config_schema,
            }),
        }
    }

    pub fn not_found() -> Self {
        Self {
            result_code: "NOT_FOUND".to_string(),
            result_msg: "Agent schema not found.".to_string(),
            data: None,
        }
    }
}

/// Port for the operations the session controller depends on.
///
/// Implementations are expected to be cheap to share behind an `Arc`.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Static, ordered list of selectable agents
    fn list_agents(&self) -> Vec<Agent>;

    /// Fetch the configuration schema of an agent
    async fn fetch_schema(&self, agent_id: &str) -> PlaygroundResult<Value>;

    /// Persist a full configuration for an agent
    async fn save_config(&self, agent_id: &str, config: ConfigMap) -> PlaygroundResult<()>;

    /// Last configuration persisted for an agent, if any
    async fn load_config(&self, agent_id: &str) -> PlaygroundResult<Option<ConfigMap>>;

    /// Start streaming a reply to `prompt`
    async fn stream_reply(&self, prompt: &str) -> PlaygroundResult<ReplyStream>;
}
