use super::id::id_from_value;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use validator::Validate;

pub const EMPTY_SEARCH_MESSAGE: &str = "Please enter a phone number or email";

/// Body of `POST /api/security/search-user`.
#[derive(Debug, Serialize, Validate, Clone, PartialEq)]
pub struct SearchRequest {
    #[validate(length(min = 1, message = "Please enter a phone number or email"))]
    pub search_term: String,
}

impl SearchRequest {
    /// Build a request from raw input, trimming surrounding whitespace.
    pub fn from_input(input: &str) -> Self {
        Self {
            search_term: input.trim().to_string(),
        }
    }
}

/// User record returned by a successful search.
///
/// The backend payload is kept exactly as received, nulls included, so it can
/// be handed to the tracking screen unchanged. Serializing a record yields
/// that payload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct UserRecord {
    pub user_id: String,
    payload: Map<String, Value>,
}

impl UserRecord {
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }

    pub fn full_name(&self) -> Option<&str> {
        self.text("full_name")
    }

    pub fn email(&self) -> Option<&str> {
        self.text("email")
    }

    pub fn phone(&self) -> Option<&str> {
        self.text("phone")
    }

    fn text(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

impl TryFrom<Map<String, Value>> for UserRecord {
    type Error = String;

    fn try_from(payload: Map<String, Value>) -> Result<Self, Self::Error> {
        let user_id = payload
            .get("user_id")
            .and_then(id_from_value)
            .ok_or_else(|| "search result has no usable user_id".to_string())?;

        Ok(Self { user_id, payload })
    }
}

impl Serialize for UserRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.payload.serialize(serializer)
    }
}
