//! Backend identifiers arrive as strings or as bare numbers depending on the
//! table they come from. Both are kept as their string form.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(Number),
}

/// `deserialize_with` for id fields that may be a string or a number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

/// Same rule applied to an already-decoded JSON value.
pub(crate) fn id_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}
