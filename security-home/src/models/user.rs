use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `GET /api/user/profile` response.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub full_name: Option<String>,
}

impl UserProfile {
    /// First whitespace-separated word of the full name, used for the greeting.
    pub fn first_name(&self) -> Option<String> {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_whitespace().next())
            .map(str::to_string)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Security,
    Admin,
    #[serde(other)]
    Other,
}

/// User metadata stored next to the session token at login.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UserMetadata {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserMetadata {
    pub fn with_role(role: Role) -> Self {
        Self {
            role: Some(role),
            ..Default::default()
        }
    }

    pub fn is_security(&self) -> bool {
        self.role == Some(Role::Security)
    }
}
