pub mod api_client;
pub mod metrics;

use crate::error::ApiError;
use crate::models::{Panic, Report, SearchRequest, TeamLocation, UserProfile, UserRecord};
use async_trait::async_trait;
use secrecy::Secret;

pub use api_client::ApiClient;

/// Backend operations the dashboard consumes. Every call is bearer-authenticated.
#[async_trait]
pub trait SecurityApi: Send + Sync {
    async fn profile(&self, token: &Secret<String>) -> Result<UserProfile, ApiError>;

    async fn team_location(&self, token: &Secret<String>) -> Result<TeamLocation, ApiError>;

    async fn nearby_panics(&self, token: &Secret<String>) -> Result<Vec<Panic>, ApiError>;

    async fn nearby_reports(&self, token: &Secret<String>) -> Result<Vec<Report>, ApiError>;

    async fn search_user(
        &self,
        token: &Secret<String>,
        request: &SearchRequest,
    ) -> Result<UserRecord, ApiError>;
}
