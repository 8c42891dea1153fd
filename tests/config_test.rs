use agent_playground::config::Settings;
use agent_playground::directory::{AgentDirectory, STORYTELLER_AGENT_ID};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_defaults_without_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_root(temp_dir.path().to_str().unwrap())?;

    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 3000);
    assert_eq!(settings.transport.schema_delay_ms, 500);
    assert_eq!(settings.transport.save_delay_ms, 700);
    assert_eq!(settings.transport.chunk_interval_ms, 80);
    assert!(settings.agents.is_empty());

    let directory = AgentDirectory::from_settings(&settings);
    assert_eq!(directory.agents()[0].id, STORYTELLER_AGENT_ID);
    Ok(())
}

#[test]
fn test_load_playground_toml() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();

    let playground_toml = r#"
[server]
host = "0.0.0.0"
port = 8080

[transport]
chunk_interval_ms = 10
reply_text = "short reply"

[[agents]]
id = "summarizer"
name = "Summarizer"

[agents.config_schema]
type = "object"

[agents.config_schema.properties.max_words]
type = "integer"
title = "Max Words"
default = 100

[agents.config_schema.properties.tone]
type = "string"
title = "Tone"
enum = ["formal", "casual"]
"#;
    fs::write(root.join("playground.toml"), playground_toml)?;

    let settings = Settings::from_root(root.to_str().unwrap())?;
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.transport.chunk_interval_ms, 10);
    assert_eq!(settings.transport.schema_delay_ms, 500);
    assert_eq!(settings.transport.reply_text, "short reply");
    assert_eq!(settings.agents.len(), 1);

    let properties = settings.agents[0].config_schema["properties"]
        .as_object()
        .unwrap();
    let keys: Vec<&str> = properties.keys().map(String::as_str).collect();
    assert_eq!(keys, ["max_words", "tone"]);
    Ok(())
}

#[test]
fn test_load_agents_from_dir() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/agents"))?;

    let json_agent = r#"
{
    "id": "a_json",
    "name": "JSON Agent",
    "config_schema": {
        "type": "object",
        "properties": {
            "verbose": { "type": "boolean", "title": "Verbose", "default": false }
        }
    }
}
"#;
    fs::write(root.join("config/agents/a.json"), json_agent)?;

    let yaml_agent = r#"
id: b_yaml
name: YAML Agent
config_schema:
  type: object
  properties:
    prompt:
      type: string
      title: Prompt
      ui:widget: textarea
"#;
    fs::write(root.join("config/agents/b.yaml"), yaml_agent)?;
    fs::write(root.join("config/agents/notes.txt"), "ignored")?;

    let settings = Settings::from_root(root.to_str().unwrap())?;
    let ids: Vec<&str> = settings.agents.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, ["a_json", "b_yaml"]);
    assert_eq!(
        settings.agents[1].config_schema["properties"]["prompt"]["ui:widget"],
        "textarea"
    );
    Ok(())
}

#[test]
fn test_invalid_agent_schema_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    fs::create_dir_all(root.join("config/agents"))?;

    let nested = r#"
{
    "id": "nested",
    "name": "Nested",
    "config_schema": {
        "type": "object",
        "properties": {
            "inner": { "type": "object", "title": "Inner" }
        }
    }
}
"#;
    fs::write(root.join("config/agents/nested.json"), nested)?;

    let err = Settings::from_root(root.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("Configuration validation failed"));
    Ok(())
}
