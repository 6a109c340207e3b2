//! Normalization of list-consents responses
//!
//! The service may answer with a bare array of consents or a wrapper
//! object containing a `consents` array. Both map to the same local
//! representation; every other shape maps to the empty list.

use medledger_core::Consent;
use serde_json::Value;

/// Total mapping from any JSON value to an ordered sequence of consents.
///
/// Elements that fail to deserialize are skipped with a warning rather
/// than discarding the rest of the response.
pub fn normalize_consent_list(value: &Value) -> Vec<Consent> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match map.get("consents") {
            Some(Value::Array(items)) => items.as_slice(),
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Consent>(item.clone()) {
            Ok(consent) => Some(consent),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed consent in list response");
                None
            }
        })
        .collect()
}
