//! Static table of selectable agents and their configuration schemas

use serde_json::{json, Value};

use crate::config::{AgentDefinition, Settings};
use crate::domain::Agent;

pub const STORYTELLER_AGENT_ID: &str = "storyteller_agent_001";

/// Read-only agent table, built once at startup and injected where needed
#[derive(Debug, Clone)]
pub struct AgentDirectory {
    entries: Vec<AgentDefinition>,
}

impl AgentDirectory {
    pub fn new(entries: Vec<AgentDefinition>) -> Self {
        Self { entries }
    }

    /// Directory for the configured agents, or the built-in one if none are configured
    pub fn from_settings(settings: &Settings) -> Self {
        if settings.agents.is_empty() {
            tracing::info!("No agents configured, serving built-in storyteller agent");
            Self::builtin()
        } else {
            Self::new(settings.agents.clone())
        }
    }

    pub fn builtin() -> Self {
        Self::new(vec![storyteller()])
    }

    pub fn agents(&self) -> Vec<Agent> {
        self.entries.iter().map(AgentDefinition::agent).collect()
    }

    pub fn schema(&self, agent_id: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.id == agent_id)
            .map(|entry| &entry.config_schema)
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == agent_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn storyteller() -> AgentDefinition {
    AgentDefinition {
        id: STORYTELLER_AGENT_ID.to_string(),
        name: "Storyteller Agent".to_string(),
        config_schema: json!({
            "title": "Storyteller Agent Config",
            "type": "object",
            "properties": {
                "model_name": {
                    "type": "string",
                    "title": "Model Name",
                    "default": "gemini-2.5-flash",
                    "description": "The underlying AI model to use."
                },
                "genre": {
                    "type": "string",
                    "title": "Story Genre",
                    "default": "Fantasy",
                    "enum": ["Fantasy", "Sci-Fi", "Mystery", "Comedy", "Horror"],
                    "description": "Select the genre for the story."
                },
                "character_name": {
                    "type": "string",
                    "title": "Main Character Name",
                    "default": "Alex",
                    "description": "Name of the protagonist."
                },
                "creativity": {
                    "type": "number",
                    "title": "Creativity Level",
                    "default": 0.8,
                    "minimum": 0.1,
                    "maximum": 1.0,
                    "description": "Higher values mean more creative, less predictable stories."
                },
                "include_moral": {
                    "type": "boolean",
                    "title": "Include a Moral",
                    "default": true,
                    "description": "End the story with a moral lesson."
                },
                "system_prompt": {
                    "type": "string",
                    "title": "System Prompt",
                    "default": "You are a master storyteller for all ages. Your stories are engaging, creative, and well-structured. You must follow the user's configuration for genre and character details.",
                    "ui:widget": "textarea",
                    "description": "The core instructions for the AI agent."
                }
            },
            "required": ["model_name", "genre", "character_name", "system_prompt"]
        }),
    }
}
