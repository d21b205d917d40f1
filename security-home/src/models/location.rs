use serde::{Deserialize, Serialize};

pub const DEFAULT_RADIUS_KM: f64 = 10.0;

/// Centre-point and radius of an agent's area of responsibility.
///
/// `(0, 0)` means the agent has not configured a location yet.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "TeamLocationResponse")]
pub struct TeamLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl TeamLocation {
    pub fn is_unset(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// Wire shape of `GET /api/security/team-location`; radius may be missing or null.
#[derive(Deserialize)]
struct TeamLocationResponse {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
    #[serde(default)]
    radius_km: Option<f64>,
}

impl From<TeamLocationResponse> for TeamLocation {
    fn from(raw: TeamLocationResponse) -> Self {
        Self {
            latitude: raw.latitude,
            longitude: raw.longitude,
            radius_km: raw.radius_km.unwrap_or(DEFAULT_RADIUS_KM),
        }
    }
}
