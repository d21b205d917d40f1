use super::state::DashboardState;
use crate::models::panic_alert::parse_timestamp;
use crate::models::{Panic, Report, ReportKind};
use chrono::{DateTime, Utc};
use std::fmt;

const UNKNOWN_USER: &str = "Unknown user";

#[derive(Debug, Clone, PartialEq)]
pub enum LocationBanner {
    Loading,
    /// Agent must set a location before nearby alerts are meaningful.
    Unset,
    Active {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanicRow {
    pub id: String,
    pub who: String,
    pub when: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub id: String,
    pub kind: ReportKind,
    pub title: String,
    pub when: Option<String>,
}

/// Render-ready snapshot of the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub greeting: String,
    pub location: LocationBanner,
    pub panics: Vec<PanicRow>,
    pub panic_total: usize,
    pub reports: Vec<ReportRow>,
    pub report_total: usize,
    pub searching: bool,
    pub refreshing: bool,
}

impl DashboardView {
    pub fn build(state: &DashboardState, now: DateTime<Utc>) -> Self {
        let greeting = match &state.first_name {
            Some(name) => format!("Hello, {}", name),
            None => "Hello".to_string(),
        };

        let location = match state.team_location {
            None => LocationBanner::Loading,
            Some(location) if location.is_unset() => LocationBanner::Unset,
            Some(location) => LocationBanner::Active {
                latitude: location.latitude,
                longitude: location.longitude,
                radius_km: location.radius_km,
            },
        };

        Self {
            greeting,
            location,
            panics: state
                .recent_panics()
                .iter()
                .map(|panic| panic_row(panic, now))
                .collect(),
            panic_total: state.panics.len(),
            reports: state
                .recent_reports()
                .iter()
                .map(|report| report_row(report, now))
                .collect(),
            report_total: state.reports.len(),
            searching: state.searching,
            refreshing: state.refreshing,
        }
    }
}

fn panic_row(panic: &Panic, now: DateTime<Utc>) -> PanicRow {
    PanicRow {
        id: panic.id.clone(),
        who: panic
            .user_name
            .clone()
            .or_else(|| panic.user_email.clone())
            .unwrap_or_else(|| UNKNOWN_USER.to_string()),
        when: panic
            .activated_at_utc()
            .map(|at| time_ago(at, now))
            .unwrap_or_else(|| panic.activated_at.clone()),
    }
}

fn report_row(report: &Report, now: DateTime<Utc>) -> ReportRow {
    ReportRow {
        id: report.id.clone(),
        kind: report.kind,
        title: report.title(),
        when: report
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .map(|at| time_ago(at, now)),
    }
}

/// Coarse relative time: "just now", "5m ago", "3h ago", "2d ago".
pub fn time_ago(at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - at).num_seconds().max(0);
    match seconds {
        0..=59 => "just now".to_string(),
        60..=3_599 => format!("{}m ago", seconds / 60),
        3_600..=86_399 => format!("{}h ago", seconds / 3_600),
        _ => format!("{}d ago", seconds / 86_400),
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.greeting)?;
        writeln!(f, "Security Dashboard")?;
        if self.refreshing {
            writeln!(f, "(refreshing…)")?;
        }
        writeln!(f)?;

        match &self.location {
            LocationBanner::Loading => writeln!(f, "Team location: loading…")?,
            LocationBanner::Unset => {
                writeln!(f, "! Team location not set. Set your location to see nearby alerts.")?
            }
            LocationBanner::Active {
                latitude,
                longitude,
                radius_km,
            } => writeln!(
                f,
                "Team location: {:.4}, {:.4} (radius {} km)",
                latitude, longitude, radius_km
            )?,
        }
        writeln!(f)?;

        writeln!(f, "Nearby panics ({})", self.panic_total)?;
        if self.panics.is_empty() {
            writeln!(f, "  No active panics nearby")?;
        }
        for row in &self.panics {
            writeln!(f, "  [{}] {} · {}", row.id, row.who, row.when)?;
        }
        writeln!(f)?;

        writeln!(f, "Nearby reports ({})", self.report_total)?;
        if self.reports.is_empty() {
            writeln!(f, "  No reports nearby")?;
        }
        for row in &self.reports {
            match &row.when {
                Some(when) => writeln!(f, "  [{}] {} ({}) · {}", row.id, row.title, row.kind, when)?,
                None => writeln!(f, "  [{}] {} ({})", row.id, row.title, row.kind)?,
            }
        }

        if self.searching {
            writeln!(f)?;
            writeln!(f, "Searching…")?;
        }
        Ok(())
    }
}
