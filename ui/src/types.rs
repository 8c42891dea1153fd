//! Shared types for the playground Web UI
//!
//! These types mirror the backend API structures, plus the client-side
//! configuration and chat models.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Generic API response wrapper
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

/// Envelope returned by the schema endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaResponse {
    pub result_code: String,
    pub result_msg: String,
    pub data: Option<SchemaData>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemaData {
    pub agent_id: String,
    pub config_schema: ObjectSchema,
}

/// One event of a streamed reply (SSE payload)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplyEvent {
    Chunk { text: String },
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Agent {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Schema
// ============================================================================

/// `ui:widget` value requesting a multi-line text control
pub const MULTILINE_WIDGET: &str = "textarea";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl FieldType {
    pub fn is_numeric(self) -> bool {
        matches!(self, FieldType::Number | FieldType::Integer)
    }
}

/// One entry of a schema's property map
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ConfigValue>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_options: Option<Vec<ConfigValue>>,
    #[serde(rename = "ui:widget", default, skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl FieldSchema {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            title: None,
            description: None,
            default: None,
            enum_options: None,
            widget: None,
            minimum: None,
            maximum: None,
        }
    }
}

/// Schema properties in document order (display order)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, FieldSchema)>);

impl Properties {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.0.iter().map(|(key, field)| (key.as_str(), field))
    }

    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, field)| field)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, FieldSchema)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, FieldSchema)>>(iter: I) -> Self {
        let mut properties = Properties::default();
        for (key, field) in iter {
            match properties.0.iter_mut().find(|(k, _)| *k == key) {
                Some(entry) => entry.1 = field,
                None => properties.0.push((key, field)),
            }
        }
        properties
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, field) in &self.0 {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of field names to field schemas")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Properties, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, field)) = access.next_entry::<String, FieldSchema>()? {
                    entries.push((key, field));
                }
                Ok(entries.into_iter().collect())
            }
        }

        deserializer.deserialize_map(PropertiesVisitor)
    }
}

/// Flat object schema describing an agent's configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ObjectSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

// ============================================================================
// Configuration values
// ============================================================================

/// A configuration field value.
///
/// `Undefined` stands for a field without a value (absent default).
/// `Number` may hold `NaN` after free numeric entry; both serialize as `null`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(f64),
    Text(String),
    Undefined,
}

static UNDEFINED: ConfigValue = ConfigValue::Undefined;

impl ConfigValue {
    pub fn is_undefined(&self) -> bool {
        matches!(self, ConfigValue::Undefined)
    }

    /// Text shown by a free-entry control; undefined displays empty
    pub fn display_text(&self) -> String {
        match self {
            ConfigValue::Undefined => String::new(),
            ConfigValue::Bool(b) => b.to_string(),
            ConfigValue::Number(n) => format_number(*n),
            ConfigValue::Text(s) => s.clone(),
        }
    }

    /// Truthiness used for toggle state
    pub fn is_truthy(&self) -> bool {
        match self {
            ConfigValue::Undefined => false,
            ConfigValue::Bool(b) => *b,
            ConfigValue::Number(n) => *n != 0.0 && !n.is_nan(),
            ConfigValue::Text(s) => !s.is_empty(),
        }
    }

    /// Numeric coercion of any value (undefined and junk text become `NaN`)
    pub fn to_number(&self) -> f64 {
        match self {
            ConfigValue::Undefined => f64::NAN,
            ConfigValue::Bool(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            ConfigValue::Number(n) => *n,
            ConfigValue::Text(s) => text_to_number(s),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Number(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Bool(value)
    }
}

/// Formats a number the way a browser displays it
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.abs() >= 1e21 || n.abs() < 1e-6 {
        // Outside [1e-6, 1e21) browsers switch to exponent notation with a signed exponent
        let text = format!("{:e}", n);
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => text,
        }
    } else {
        n.to_string()
    }
}

fn text_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust also accepts "inf"/"nan" spellings
        t if t.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => f64::NAN,
        t => t.parse().unwrap_or(f64::NAN),
    }
}

/// Flat field-name to value configuration.
///
/// Copies are independent; editing produces a new value rather than mutating in place.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct AgentConfig(BTreeMap<String, ConfigValue>);

impl AgentConfig {
    /// Projects each property's declared default (absent default is `Undefined`)
    pub fn from_defaults(schema: &ObjectSchema) -> Self {
        AgentConfig(
            schema
                .properties
                .iter()
                .map(|(key, field)| {
                    let value = field.default.clone().unwrap_or(ConfigValue::Undefined);
                    (key.to_string(), value)
                })
                .collect(),
        )
    }

    /// Value of a field, `Undefined` when the key is absent
    pub fn get(&self, key: &str) -> &ConfigValue {
        self.0.get(key).unwrap_or(&UNDEFINED)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Copy of this configuration with exactly one field replaced
    pub fn with_field(&self, key: &str, value: ConfigValue) -> Self {
        let mut next = self.clone();
        next.0.insert(key.to_string(), value);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ConfigValue)> for AgentConfig {
    fn from_iter<I: IntoIterator<Item = (K, ConfigValue)>>(iter: I) -> Self {
        AgentConfig(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// ============================================================================
// Chat
// ============================================================================

pub type MessageId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
}
