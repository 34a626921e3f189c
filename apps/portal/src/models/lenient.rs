//! Field decoders for the backend's loose JSON: Jackson writes `null` for unset fields,
//! which `#[serde(default)]` alone does not cover.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// `null` decodes as `T::default()`. Pair with `#[serde(default)]` for missing fields.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Job requirements are free-form on the backend: a list, `{"skills": [..]}`,
/// a single string, or `null`.
pub fn requirements<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(mut map)) => match map.remove("skills") {
            Some(skills) => text_list(skills),
            None => Vec::new(),
        },
        Some(other) => text_list(other),
    })
}

fn text_list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(text).collect(),
        other => text(other).into_iter().collect(),
    }
}

fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
