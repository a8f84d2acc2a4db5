use serde_json::{Map, Value};

use crate::view::view_model::RepeatKind;

/// One step of a dotted reference such as `Employees(2).Address.City`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    /// `Name(n)`, 1-based position inside a page list.
    ListItem { name: String, position: usize },
    /// `Name(key)`, named entry inside a page group.
    GroupItem { name: String, key: String },
}

/// Drop the leading `.` of a relative property path.
pub fn expand_relative_path(path: &str) -> &str {
    path.strip_prefix('.').unwrap_or(path)
}

/// Split a reference into segments. Dots inside parentheses belong to the
/// subscript, not the path.
pub fn parse_reference(reference: &str) -> Vec<PathSegment> {
    let reference = expand_relative_path(reference);
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (i, c) in reference.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                parts.push(&reference[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&reference[start..]);

    parts
        .into_iter()
        .filter(|p| !p.is_empty())
        .map(parse_segment)
        .collect()
}

fn parse_segment(part: &str) -> PathSegment {
    let subscript = part
        .find('(')
        .filter(|_| part.ends_with(')'))
        .map(|open| (&part[..open], &part[open + 1..part.len() - 1]));

    match subscript {
        Some((name, inner)) => match inner.parse::<usize>() {
            Ok(position) if position > 0 => PathSegment::ListItem {
                name: name.to_string(),
                position,
            },
            _ => PathSegment::GroupItem {
                name: name.to_string(),
                key: inner.trim_matches('"').to_string(),
            },
        },
        None => PathSegment::Key(part.to_string()),
    }
}

// ============================================================================
// Nested content access
// ============================================================================

/// Read the value stored at `reference` inside nested case content.
pub fn read_path<'a>(content: &'a Value, reference: &str) -> Option<&'a Value> {
    let mut cursor = content;
    for segment in parse_reference(reference) {
        cursor = match segment {
            PathSegment::Key(name) => cursor.get(name.as_str())?,
            PathSegment::ListItem { name, position } => cursor.get(name.as_str())?.get(position - 1)?,
            PathSegment::GroupItem { name, key } => cursor.get(name.as_str())?.get(key.as_str())?,
        };
    }
    Some(cursor)
}

/// Write `value` at `reference`, creating intermediate objects and list
/// rows as needed. Returns false when the reference is empty.
pub fn write_path(content: &mut Value, reference: &str, value: Value) -> bool {
    match slot_mut(content, reference) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

/// The repeating structure bound to a list or group layout, created empty
/// when the content does not hold one yet.
pub fn repeat_target<'a>(
    content: &'a mut Value,
    reference: &str,
    kind: RepeatKind,
) -> Option<&'a mut Value> {
    let slot = slot_mut(content, reference)?;
    match kind {
        RepeatKind::List if !slot.is_array() => *slot = Value::Array(Vec::new()),
        RepeatKind::Group if !slot.is_object() => *slot = Value::Object(Map::new()),
        _ => {}
    }
    Some(slot)
}

/// A new row for a page list, shaped like the existing rows with every leaf
/// emptied.
pub fn blank_row_like(rows: &[Value]) -> Value {
    rows.last()
        .map(blank_leaves)
        .unwrap_or_else(|| Value::Object(Map::new()))
}

fn blank_leaves(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), blank_leaves(v)))
                .collect(),
        ),
        Value::Array(_) => Value::Array(Vec::new()),
        Value::Bool(_) => Value::Bool(false),
        _ => Value::String(String::new()),
    }
}

fn slot_mut<'a>(content: &'a mut Value, reference: &str) -> Option<&'a mut Value> {
    let segments = parse_reference(reference);
    if segments.is_empty() {
        return None;
    }

    let mut cursor = content;
    for segment in segments {
        cursor = match segment {
            PathSegment::Key(name) => ensure_object(cursor)?.entry(name).or_insert(Value::Null),
            PathSegment::ListItem { name, position } => {
                let list = ensure_array(ensure_object(cursor)?.entry(name).or_insert(Value::Null))?;
                while list.len() < position {
                    list.push(Value::Object(Map::new()));
                }
                list.get_mut(position - 1)?
            }
            PathSegment::GroupItem { name, key } => {
                let group = ensure_object(cursor)?.entry(name).or_insert(Value::Null);
                ensure_object(group)?.entry(key).or_insert(Value::Null)
            }
        };
    }
    Some(cursor)
}

fn ensure_object(value: &mut Value) -> Option<&mut Map<String, Value>> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    value.as_object_mut()
}

fn ensure_array(value: &mut Value) -> Option<&mut Vec<Value>> {
    if !value.is_array() {
        *value = Value::Array(Vec::new());
    }
    value.as_array_mut()
}
