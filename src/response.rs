//! Response envelope types and shape normalization
//!
//! Every backend endpoint answers `{ success, message?, data }`, but list
//! endpoints are inconsistent about where the array lives: sometimes `data` is
//! the array itself, sometimes it is nested one level deeper under the
//! resource's plural key (`data.languages`, `data.dialogues`). All unwrapping
//! happens here so the rest of the crate only ever sees one canonical shape.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// The raw response envelope, before any shape normalization
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl ApiEnvelope {
    /// The server message, or an empty string when absent
    pub fn message_or_empty(&self) -> String {
        self.message.clone().unwrap_or_default()
    }
}

/// Extract a typed list from an envelope's `data`, tolerating every nesting
/// the backend is known to produce:
///
/// - `data` is `{ "<plural_key>": [...] }` → the nested array
/// - `data` is `[...]` → the array itself
/// - `data` is `{ "data": [...] }` → the doubly-wrapped array
/// - anything else (including absent `data`) → an empty list
pub fn unwrap_list<T: DeserializeOwned>(
    envelope: &ApiEnvelope,
    plural_key: &str,
) -> Result<Vec<T>, Error> {
    let items = match &envelope.data {
        Some(Value::Object(map)) => match map.get(plural_key) {
            Some(Value::Array(items)) => items.clone(),
            _ => match map.get("data") {
                Some(Value::Array(items)) => items.clone(),
                _ => Vec::new(),
            },
        },
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(Error::from))
        .collect()
}

/// Extract a typed object from an envelope's `data`, tolerating a single
/// nesting under `singular_key` (`data.language`) as well as `data` being the
/// object itself.
pub fn unwrap_object<T: DeserializeOwned>(
    envelope: &ApiEnvelope,
    singular_key: &str,
) -> Result<T, Error> {
    let data = envelope
        .data
        .clone()
        .ok_or_else(|| Error::general("Response contained no data"))?;

    let value = match &data {
        Value::Object(map) => match map.get(singular_key) {
            Some(nested @ Value::Object(_)) => nested.clone(),
            _ => data,
        },
        _ => data,
    };

    serde_json::from_value(value).map_err(Error::from)
}
