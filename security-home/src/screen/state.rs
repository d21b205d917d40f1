use crate::models::{Panic, Report, TeamLocation};
use chrono::{DateTime, Utc};

/// Items shown per list on the dashboard itself.
pub const PREVIEW_LIMIT: usize = 3;

/// Everything the dashboard renders. Owned by the screen; loaders merge into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub first_name: Option<String>,
    /// `None` until the location loader has succeeded once.
    pub team_location: Option<TeamLocation>,
    pub panics: Vec<Panic>,
    pub reports: Vec<Report>,
    pub searching: bool,
    pub refreshing: bool,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl DashboardState {
    /// Whether to show the "location not set" warning.
    pub fn location_unset(&self) -> bool {
        self.team_location
            .as_ref()
            .is_some_and(TeamLocation::is_unset)
    }

    pub fn recent_panics(&self) -> &[Panic] {
        &self.panics[..self.panics.len().min(PREVIEW_LIMIT)]
    }

    pub fn recent_reports(&self) -> &[Report] {
        &self.reports[..self.reports.len().min(PREVIEW_LIMIT)]
    }
}
