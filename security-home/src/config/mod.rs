use client_core::config::load_configuration;
use client_core::CoreError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const COMPONENT_NAME: &str = "security-home";

/// Preview backend used when neither build nor runtime configuration names one.
pub const DEFAULT_BACKEND_URL: &str = "https://security-dashboard.preview.local";

#[derive(Deserialize, Clone, Debug, Default)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub polling: PollingSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Backend base URL, without trailing path.
    #[serde(default = "default_backend_url")]
    pub base_url: String,
    /// Deadline for profile, location and nearby-data calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Deadline for the user search call.
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
}

impl ApiSettings {
    /// Zero is raised to one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs.max(1))
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            request_timeout_secs: default_request_timeout_secs(),
            search_timeout_secs: default_search_timeout_secs(),
        }
    }
}

/// Build-time `SECURITY_HOME_BACKEND_URL` wins over the preview host.
fn default_backend_url() -> String {
    option_env!("SECURITY_HOME_BACKEND_URL")
        .unwrap_or(DEFAULT_BACKEND_URL)
        .to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_search_timeout_secs() -> u64 {
    15
}

#[derive(Deserialize, Clone, Debug)]
pub struct PollingSettings {
    #[serde(default = "default_poll_interval_secs")]
    pub interval_secs: u64,
}

impl PollingSettings {
    /// Poll period, never shorter than one second.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval_secs(),
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    30
}

#[derive(Deserialize, Clone, Debug)]
pub struct SessionSettings {
    /// JSON file holding the device-local session entry.
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
        }
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".security-home").join("session.json")
}

#[derive(Deserialize, Clone, Debug)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// OTLP gRPC collector, e.g. `http://tempo:4317`. Export is off when unset.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

pub fn get_configuration() -> Result<Settings, CoreError> {
    load_configuration(COMPONENT_NAME)
}
