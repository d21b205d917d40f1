use chrono::{DateTime, NaiveDateTime, Utc};
use super::id::string_or_number;
use serde::{Deserialize, Serialize};

/// An active emergency raised by an end-user near the agent's team location.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Panic {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Timestamp as sent by the backend; see [`Panic::activated_at_utc`].
    pub activated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Panic {
    /// Activation time, accepting RFC 3339 or a naive ISO timestamp taken as UTC.
    pub fn activated_at_utc(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.activated_at)
    }
}

pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
