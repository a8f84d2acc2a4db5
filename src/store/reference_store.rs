use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::registry::component_registry::ComponentRegistry;
use crate::store::path::{expand_relative_path, write_path};
use crate::view::view_model::ValueReference;

/// Flat map from a field reference to its current value.
///
/// This is the single source of truth posted back to the server; it must
/// agree with what every registered widget displays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceStore {
    values: IndexMap<String, Value>,
}

impl ReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, reference: &str) -> Option<&Value> {
        self.values.get(expand_relative_path(reference))
    }

    /// Non-blank text rendering of the value at `reference`.
    pub fn text(&self, reference: &str) -> Option<String> {
        self.get(reference)
            .filter(|v| !is_blank(v))
            .map(value_to_text)
    }

    pub fn set(&mut self, reference: &str, value: Value) -> Option<Value> {
        self.values
            .insert(expand_relative_path(reference).to_string(), value)
    }

    pub fn remove(&mut self, reference: &str) -> Option<Value> {
        self.values.shift_remove(expand_relative_path(reference))
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.values.contains_key(expand_relative_path(reference))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Value a value reference points at: the live store value, else the
    /// server's last saved value.
    pub fn resolve_reference(&self, value_reference: &ValueReference) -> Option<String> {
        value_reference
            .reference
            .as_deref()
            .and_then(|r| self.text(r))
            .or_else(|| value_reference.last_saved_value.as_deref().map(decode_html))
            .filter(|v| !v.is_empty())
    }

    /// Resolve a property expression used by action metadata.
    ///
    /// Booleans pass through, `"quoted"` text is a literal, anything else is
    /// looked up as a (possibly relative) reference. With a `fallback`, an
    /// unresolved lookup yields its last saved value or null; without one
    /// the expression itself is returned.
    pub fn resolve_property(&self, property: &Value, fallback: Option<&ValueReference>) -> Value {
        let text = match property {
            Value::String(text) => text,
            other => return other.clone(),
        };

        if text.starts_with('"') {
            return Value::String(text.replace('"', ""));
        }

        if let Some(found) = self.get(text).filter(|v| !is_blank(v)) {
            return found.clone();
        }

        match fallback {
            Some(value_reference) => value_reference
                .last_saved_value
                .as_deref()
                .map(|saved| Value::String(decode_html(saved)))
                .unwrap_or(Value::Null),
            None => property.clone(),
        }
    }

    /// Serialize into the nested content shape the server expects.
    ///
    /// References owned only by read-only registrations are left out;
    /// checkbox references are posted as booleans and date-only references
    /// as `YYYYMMDD`.
    pub fn to_post_content(&self, registry: &ComponentRegistry) -> Value {
        let mut content = Value::Object(Map::new());
        for (reference, value) in &self.values {
            if !registry.is_posted(reference) {
                continue;
            }
            let value = if registry.is_checkbox(reference) {
                Value::Bool(is_truthy(value))
            } else if registry.is_date(reference) {
                match value {
                    Value::String(date) => Value::String(date.replace('-', "")),
                    other => other.clone(),
                }
            } else {
                value.clone()
            };
            write_path(&mut content, reference, value);
        }
        content
    }
}

/// Null, empty text and `false` count as "no value".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        _ => false,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Decode HTML entities the server embeds in saved values.
pub fn decode_html(value: &str) -> String {
    html_escape::decode_html_entities(value).into_owned()
}
