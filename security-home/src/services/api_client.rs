use crate::config::ApiSettings;
use crate::error::ApiError;
use crate::models::{Panic, Report, SearchRequest, TeamLocation, UserProfile, UserRecord};
use crate::services::metrics::record_api_call;
use crate::services::SecurityApi;
use async_trait::async_trait;
use client_core::observability::TracedClientExt;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};

pub const PROFILE_PATH: &str = "/api/user/profile";
pub const TEAM_LOCATION_PATH: &str = "/api/security/team-location";
pub const NEARBY_REPORTS_PATH: &str = "/api/security/nearby-reports";
pub const NEARBY_PANICS_PATH: &str = "/api/security/nearby-panics";
pub const SEARCH_USER_PATH: &str = "/api/security/search-user";

/// HTTP client for the safety backend.
pub struct ApiClient {
    client: Client,
    settings: ApiSettings,
}

/// Error body shape used by the backend: `{ "detail": ... }`.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<Value>,
}

impl ApiClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("security-home/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self { client, settings })
    }

    pub fn base_url(&self) -> &str {
        self.settings.base_url.trim_end_matches('/')
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url(), path)
    }

    /// Send a GET request with the bearer token and the loader timeout.
    pub async fn get_with_auth(
        &self,
        path: &str,
        token: &Secret<String>,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);

        self.client
            .traced_get(&url)
            .bearer_auth(token.expose_secret())
            .timeout(self.settings.request_timeout())
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("GET {} failed: {}", url, e);
                ApiError::from(e)
            })
    }

    /// Send a JSON POST request with the bearer token and an explicit timeout.
    pub async fn post_with_auth<B: Serialize + Sync>(
        &self,
        path: &str,
        token: &Secret<String>,
        body: &B,
        timeout: Duration,
    ) -> Result<Response, ApiError> {
        let url = self.url(path);

        self.client
            .traced_post(&url)
            .bearer_auth(token.expose_secret())
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                tracing::debug!("POST {} failed: {}", url, e);
                ApiError::from(e)
            })
    }

    async fn fetch<T, F>(&self, endpoint: &'static str, request: F) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        F: Future<Output = Result<Response, ApiError>>,
    {
        let started = Instant::now();

        let result = match request.await {
            Ok(response) => decode(response).await,
            Err(e) => Err(e),
        };

        record_api_call(endpoint, outcome_label(&result), started.elapsed());
        tracing::debug!(
            endpoint,
            elapsed_ms = started.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "Backend call finished"
        );

        result
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let detail = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .and_then(|detail| match detail {
            Value::String(message) => Some(message),
            Value::Null => None,
            other => Some(other.to_string()),
        });

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized,
        StatusCode::NOT_FOUND => ApiError::NotFound(detail),
        _ => ApiError::Status { status, detail },
    })
}

fn outcome_label<T>(result: &Result<T, ApiError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(ApiError::Unauthorized) => "unauthorized",
        Err(ApiError::NotFound(_)) => "not_found",
        Err(ApiError::Status { .. }) => "http_error",
        Err(ApiError::Timeout) => "timeout",
        Err(ApiError::Decode(_)) => "decode_error",
        Err(ApiError::Transport(_) | ApiError::Client(_)) => "transport_error",
    }
}

#[async_trait]
impl SecurityApi for ApiClient {
    async fn profile(&self, token: &Secret<String>) -> Result<UserProfile, ApiError> {
        self.fetch("profile", self.get_with_auth(PROFILE_PATH, token))
            .await
    }

    async fn team_location(&self, token: &Secret<String>) -> Result<TeamLocation, ApiError> {
        self.fetch("team-location", self.get_with_auth(TEAM_LOCATION_PATH, token))
            .await
    }

    async fn nearby_panics(&self, token: &Secret<String>) -> Result<Vec<Panic>, ApiError> {
        self.fetch("nearby-panics", self.get_with_auth(NEARBY_PANICS_PATH, token))
            .await
    }

    async fn nearby_reports(&self, token: &Secret<String>) -> Result<Vec<Report>, ApiError> {
        self.fetch("nearby-reports", self.get_with_auth(NEARBY_REPORTS_PATH, token))
            .await
    }

    async fn search_user(
        &self,
        token: &Secret<String>,
        request: &SearchRequest,
    ) -> Result<UserRecord, ApiError> {
        self.fetch(
            "search-user",
            self.post_with_auth(
                SEARCH_USER_PATH,
                token,
                request,
                self.settings.search_timeout(),
            ),
        )
        .await
    }
}
