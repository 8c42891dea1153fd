use config::{Config, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub mod validator;

use crate::cli::Cli;
use crate::domain::Agent;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub transport: TransportSettings,
    /// Agents exposed by the directory, in display order.
    /// When empty the built-in storyteller agent is served.
    #[serde(default)]
    pub agents: Vec<AgentDefinition>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UiSettings {
    /// Directory holding the built web UI (index.html + wasm bundle)
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            dist_dir: default_dist_dir(),
        }
    }
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("ui/dist")
}

/// Timing and content of the mocked agent transport
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TransportSettings {
    #[serde(default = "default_schema_delay")]
    pub schema_delay_ms: u64,
    #[serde(default = "default_save_delay")]
    pub save_delay_ms: u64,
    /// Delay between two streamed reply fragments
    #[serde(default = "default_chunk_interval")]
    pub chunk_interval_ms: u64,
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
}

impl Default for TransportSettings {
    fn default() -> Self {
        Self {
            schema_delay_ms: default_schema_delay(),
            save_delay_ms: default_save_delay(),
            chunk_interval_ms: default_chunk_interval(),
            reply_text: default_reply_text(),
        }
    }
}

fn default_schema_delay() -> u64 {
    500
}

fn default_save_delay() -> u64 {
    700
}

fn default_chunk_interval() -> u64 {
    80
}

fn default_reply_text() -> String {
    "This is a streamed response from the agent, demonstrating how Server-Sent Events would work. \
     Each part of this sentence is delivered as a separate chunk, creating a real-time typing effect for the user. \
     This improves the user experience by providing immediate feedback. The simulation is now complete."
        .to_string()
}

/// An agent together with its configuration schema
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AgentDefinition {
    pub id: String,
    pub name: String,
    /// Flat object JSON Schema; property order is display order
    pub config_schema: Value,
}

impl AgentDefinition {
    pub fn agent(&self) -> Agent {
        Agent {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::from_root(".")
    }

    /// Create settings from CLI arguments (includes config file and CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let root = cli
            .config
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let mut settings = Self::load(File::from(cli.config.clone()).required(false))?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);
        settings.load_agents_from_dir(&format!("{}/config/agents", root))?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("playground");
        let mut settings = Self::load(File::from(config_path).required(false))?;

        settings.load_agents_from_dir(&format!("{}/config/agents", root))?;
        settings.validate()?;

        Ok(settings)
    }

    fn load<S>(source: S) -> Result<Self, anyhow::Error>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let s = Config::builder()
            .add_source(source)
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(dir) = &cli.ui_dir {
            self.ui.dist_dir = dir.clone();
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    fn load_agents_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in glob::glob(&pattern)? {
            match entry {
                Ok(path) => paths.push(path),
                Err(e) => tracing::warn!("Failed to read glob entry: {}", e),
            }
        }
        // Directory listing order is platform dependent
        paths.sort();

        for path in paths {
            let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
                continue;
            };
            if !matches!(ext, "json" | "yaml" | "yml" | "toml") {
                continue;
            }
            let content = std::fs::read_to_string(&path)?;
            let agent: AgentDefinition = match ext {
                "json" => serde_json::from_str(&content)?,
                "toml" => toml::from_str(&content)?,
                _ => serde_yaml::from_str(&content)?,
            };
            tracing::debug!("Loaded agent {} from {}", agent.id, path.display());
            self.agents.push(agent);
        }
        Ok(())
    }
}
