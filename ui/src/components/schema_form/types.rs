//! Core types for schema-driven form generation
//!
//! Widget selection, the per-field view model and the value conversions the
//! controls apply. Nothing here touches the DOM.

use crate::types::{
    format_number, AgentConfig, ConfigValue, FieldSchema, FieldType, ObjectSchema,
    MULTILINE_WIDGET,
};

/// Step of the range control
pub const SLIDER_STEP: f64 = 0.01;

// ============================================================================
// Widget Selection
// ============================================================================

/// Control used to edit one field
#[derive(Clone, Debug, PartialEq)]
pub enum WidgetKind {
    /// Dropdown over the declared options
    Select { options: Vec<ConfigValue> },
    TextArea,
    Toggle,
    /// Range control with a two-decimal readout
    Slider { minimum: f64, maximum: f64 },
    NumberInput {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    TextInput,
}

type WidgetRule = fn(&FieldSchema) -> Option<WidgetKind>;

/// Evaluated top-down; the first match wins, fields matching none get a text input
const WIDGET_RULES: [WidgetRule; 5] = [
    select_rule,
    multiline_rule,
    toggle_rule,
    slider_rule,
    number_rule,
];

fn select_rule(field: &FieldSchema) -> Option<WidgetKind> {
    field
        .enum_options
        .as_ref()
        .map(|options| WidgetKind::Select {
            options: options.clone(),
        })
}

fn multiline_rule(field: &FieldSchema) -> Option<WidgetKind> {
    (field.widget.as_deref() == Some(MULTILINE_WIDGET)).then_some(WidgetKind::TextArea)
}

fn toggle_rule(field: &FieldSchema) -> Option<WidgetKind> {
    (field.field_type == FieldType::Boolean).then_some(WidgetKind::Toggle)
}

fn slider_rule(field: &FieldSchema) -> Option<WidgetKind> {
    if !field.field_type.is_numeric() {
        return None;
    }
    match (field.minimum, field.maximum) {
        (Some(minimum), Some(maximum)) => Some(WidgetKind::Slider { minimum, maximum }),
        _ => None,
    }
}

fn number_rule(field: &FieldSchema) -> Option<WidgetKind> {
    field
        .field_type
        .is_numeric()
        .then_some(WidgetKind::NumberInput {
            minimum: field.minimum,
            maximum: field.maximum,
        })
}

impl WidgetKind {
    pub fn for_field(field: &FieldSchema) -> Self {
        WIDGET_RULES
            .iter()
            .find_map(|rule| rule(field))
            .unwrap_or(WidgetKind::TextInput)
    }

    /// Value produced by a text-carrying control (everything but the toggle)
    pub fn value_from_input(&self, raw: &str) -> ConfigValue {
        match self {
            WidgetKind::Slider { .. } | WidgetKind::NumberInput { .. } => {
                ConfigValue::Number(parse_float(raw))
            }
            WidgetKind::Toggle => ConfigValue::Bool(raw == "true"),
            WidgetKind::Select { .. } | WidgetKind::TextArea | WidgetKind::TextInput => {
                ConfigValue::Text(raw.to_string())
            }
        }
    }
}

// ============================================================================
// Field View Model
// ============================================================================

/// Everything needed to render one field row
#[derive(Clone, Debug, PartialEq)]
pub struct FieldControl {
    pub key: String,
    /// DOM id shared by the label and the control
    pub id: String,
    pub label: String,
    pub helper_text: Option<String>,
    /// Boolean fields render the label beside the control
    pub inline_label: bool,
    pub widget: WidgetKind,
}

impl FieldControl {
    pub fn new(key: &str, field: &FieldSchema) -> Self {
        let label = match field.title.as_deref() {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => key.to_string(),
        };
        let is_boolean = field.field_type == FieldType::Boolean;
        let helper_text = if is_boolean {
            None
        } else {
            field.description.clone().filter(|d| !d.is_empty())
        };

        Self {
            key: key.to_string(),
            id: format!("form-field-{}", key),
            label,
            helper_text,
            inline_label: is_boolean,
            widget: WidgetKind::for_field(field),
        }
    }
}

/// One control per property, in schema order
pub fn field_controls(schema: &ObjectSchema) -> Vec<FieldControl> {
    schema
        .properties
        .iter()
        .map(|(key, field)| FieldControl::new(key, field))
        .collect()
}

/// Configuration after one field edit; every other field is untouched
pub fn apply_field_edit(config: &AgentConfig, key: &str, value: ConfigValue) -> AgentConfig {
    config.with_field(key, value)
}

/// Option shown as selected: the one matching the value, otherwise the first
pub fn selected_option(options: &[String], value: &ConfigValue) -> String {
    let current = value.display_text();
    options
        .iter()
        .find(|option| **option == current)
        .or_else(|| options.first())
        .cloned()
        .unwrap_or_default()
}

// ============================================================================
// Numeric Conversions
// ============================================================================

/// Lenient float parsing: the longest numeric prefix counts, anything else is `NaN`.
///
/// `"0.5abc"` is 0.5, `"abc"` and `""` are `NaN`.
pub fn parse_float(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let len = bytes.len();
    let is_digit = |i: usize| i < len && bytes[i].is_ascii_digit();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = end;
    while is_digit(end) {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < len && bytes[end] == b'.' {
        let mut frac_end = end + 1;
        while is_digit(frac_end) {
            frac_end += 1;
        }
        digits += frac_end - (end + 1);
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if end < len && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < len && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while is_digit(exp_end) {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Slider readout with exactly two decimals.
///
/// Rounds to nearest; an exact tie rounds away from zero (0.125 reads "0.13").
pub fn format_slider_value(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if n == 0.0 {
        // Negative zero reads as plain zero
        return "0.00".to_string();
    }

    let abs = n.abs();
    if abs >= 1e21 {
        return format_number(n);
    }

    // Enough digits to see the whole binary expansion around the third decimal
    let exact = format!("{:.30}", abs);
    let is_tie = match exact.split_once('.') {
        Some((_, fraction)) => {
            fraction.as_bytes().get(2) == Some(&b'5') && fraction[3..].bytes().all(|b| b == b'0')
        }
        None => false,
    };

    let digits = if is_tie {
        round_up_last_digit(&exact[..exact.len() - 28])
    } else {
        format!("{:.2}", abs)
    };

    if n < 0.0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

/// Adds one unit in the last place of a plain decimal string, carrying left
fn round_up_last_digit(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    for c in chars.iter_mut().rev() {
        match *c {
            '.' => continue,
            '9' => *c = '0',
            d => {
                *c = (d as u8 + 1) as char;
                return chars.into_iter().collect();
            }
        }
    }
    std::iter::once('1').chain(chars).collect()
}
