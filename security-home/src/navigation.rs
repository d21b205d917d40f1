use std::fmt;

/// Screens the dashboard can navigate to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Nearby,
    Chat,
    Settings,
    SetLocation,
    Panics { panic_id: Option<String> },
    Reports { report_id: Option<String> },
    /// Tracking screen; `user_data` is the serialized search result.
    UserTrack { user_data: String },
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/auth/login",
            Route::Nearby => "/security/nearby",
            Route::Chat => "/security/chat",
            Route::Settings => "/security/settings",
            Route::SetLocation => "/security/set-location",
            Route::Panics { .. } => "/security/panics",
            Route::Reports { .. } => "/security/reports",
            Route::UserTrack { .. } => "/security/user-track",
        }
    }

    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Route::Panics {
                panic_id: Some(id),
            } => vec![("panicId", id.as_str())],
            Route::Reports {
                report_id: Some(id),
            } => vec![("reportId", id.as_str())],
            Route::UserTrack { user_data } => vec![("userData", user_data.as_str())],
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())?;
        for (i, (key, value)) in self.params().into_iter().enumerate() {
            let separator = if i == 0 { '?' } else { '&' };
            write!(f, "{}{}={}", separator, key, urlencoding::encode(value))?;
        }
        Ok(())
    }
}

/// Host router. `replace` drops the current screen from history, `push` keeps it.
pub trait Navigator: Send + Sync {
    fn replace(&self, route: Route);
    fn push(&self, route: Route);
}
