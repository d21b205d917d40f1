use async_trait::async_trait;

/// A modal message shown to the agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn access_denied() -> Self {
        Self::new(
            "Access Denied",
            "This dashboard is only available to security personnel.",
        )
    }

    pub fn session_expired() -> Self {
        Self::new("Session Expired", "Please login again.")
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    pub fn not_found(detail: Option<&str>) -> Self {
        Self::new("Not Found", detail.unwrap_or("User not found"))
    }

    pub fn confirm_logout() -> Self {
        Self::new("Logout", "Are you sure you want to logout?")
    }
}

/// Host UI for alerts and confirmations. Both calls resolve once dismissed.
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn alert(&self, alert: Alert);

    async fn confirm(&self, alert: Alert) -> bool;
}
