//! Error types for the playground backend

use thiserror::Error;

/// Errors raised by agent transport operations
#[derive(Debug, Error)]
pub enum PlaygroundError {
    /// No schema is registered for the requested agent id
    #[error("Agent schema not found: {0}")]
    SchemaNotFound(String),

    /// The transport rejected a configuration save
    #[error("Failed to save config for agent {agent_id}: {reason}")]
    SaveFailed { agent_id: String, reason: String },
}

/// Result type alias for transport operations
pub type PlaygroundResult<T> = Result<T, PlaygroundError>;
