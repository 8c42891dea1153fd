//! Errors surfaced by the API client

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaygroundError {
    /// The backend has no schema for this agent id
    #[error("Agent schema not found: {0}")]
    SchemaNotFound(String),

    /// The backend rejected a configuration save
    #[error("Failed to save config: {0}")]
    SaveFailed(String),

    /// Request, decoding or stream failure
    #[error("Transport error: {0}")]
    Transport(String),
}
