use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::config::{AgentDefinition, ServerSettings, Settings, TransportSettings};

/// Field types a flat configuration schema may declare
pub const PRIMITIVE_TYPES: [&str; 4] = ["string", "number", "integer", "boolean"];

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Duplicate entry: {0}")]
    Duplicate(String),
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        errors.extend(Self::validate_server(&settings.server));
        errors.extend(Self::validate_transport(&settings.transport));
        errors.extend(Self::validate_agents(&settings.agents));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_server(server: &ServerSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if server.host.is_empty() {
            errors.push(ValidationError::MissingField("server.host".to_string()));
        }

        if server.port == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "server.port".to_string(),
                reason: "Port must be greater than 0".to_string(),
            });
        }

        errors
    }

    fn validate_transport(transport: &TransportSettings) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if transport.chunk_interval_ms == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "transport.chunk_interval_ms".to_string(),
                reason: "Chunk interval must be greater than 0".to_string(),
            });
        }

        errors
    }

    fn validate_agents(agents: &[AgentDefinition]) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut seen_ids = HashMap::new();

        for (idx, agent) in agents.iter().enumerate() {
            if let Some(prev_idx) = seen_ids.insert(&agent.id, idx) {
                errors.push(ValidationError::Duplicate(format!(
                    "Agent id '{}' appears at indices {} and {}",
                    agent.id, prev_idx, idx
                )));
            }

            if agent.id.is_empty() {
                errors.push(ValidationError::MissingField(format!("agents[{}].id", idx)));
            }

            if agent.name.is_empty() {
                errors.push(ValidationError::MissingField(format!("agents[{}].name", idx)));
            }

            errors.extend(Self::validate_schema(
                &format!("agents[{}].config_schema", idx),
                &agent.config_schema,
            ));
        }

        errors
    }

    /// Checks that a schema is a flat object of primitive fields
    pub fn validate_schema(field: &str, schema: &Value) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let invalid = |field: String, reason: &str| ValidationError::InvalidValue {
            field,
            reason: reason.to_string(),
        };

        if let Some(kind) = schema.get("type") {
            if kind != "object" {
                errors.push(invalid(format!("{}.type", field), "Schema type must be 'object'"));
            }
        }

        let Some(properties) = schema.get("properties") else {
            errors.push(ValidationError::MissingField(format!("{}.properties", field)));
            return errors;
        };
        let Some(properties) = properties.as_object() else {
            errors.push(invalid(
                format!("{}.properties", field),
                "Properties must be an object",
            ));
            return errors;
        };

        for (name, property) in properties {
            let path = format!("{}.properties.{}", field, name);

            match property.get("type").and_then(Value::as_str) {
                Some(kind) if PRIMITIVE_TYPES.contains(&kind) => {}
                Some(_) => errors.push(invalid(
                    format!("{}.type", path),
                    "Only string, number, integer and boolean fields are supported",
                )),
                None => errors.push(ValidationError::MissingField(format!("{}.type", path))),
            }

            for bound in ["minimum", "maximum"] {
                if let Some(value) = property.get(bound) {
                    if !value.is_number() {
                        errors.push(invalid(format!("{}.{}", path, bound), "Bound must be numeric"));
                    }
                }
            }

            if let Some(options) = property.get("enum") {
                if !options.is_array() {
                    errors.push(invalid(format!("{}.enum", path), "Enum must be an array"));
                }
            }
        }

        errors
    }
}
