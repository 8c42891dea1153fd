//! Schema-Driven Configuration Form
//!
//! Renders one control per property of an agent's flat configuration schema
//! and reports every edit as a complete new configuration.

pub mod types;
pub mod generator;
pub mod fields;

pub use types::*;
pub use generator::*;
