//! The security agent's home screen.
//!
//! Mount runs the session guard, then the profile, team-location and
//! nearby-data loaders in order, then starts the nearby-data poller. Any 401
//! ends the session exactly once: the store is cleared, the poller stops and
//! the host is sent to the login route.

pub mod poller;
pub mod state;
pub mod view;

use crate::error::{ApiError, DashboardError};
use crate::models::search::EMPTY_SEARCH_MESSAGE;
use crate::models::{SearchRequest, UserRecord};
use crate::navigation::{Navigator, Route};
use crate::prompt::{Alert, Prompter};
use crate::services::SecurityApi;
use crate::session::SessionContext;
use chrono::Utc;
use poller::PollHandle;
use secrecy::Secret;
use state::DashboardState;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};
use validator::Validate;
use view::DashboardView;

pub use state::PREVIEW_LIMIT;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Collaborators the screen is wired to by its host.
#[derive(Clone)]
pub struct Dependencies {
    pub api: Arc<dyn SecurityApi>,
    pub session: Arc<dyn SessionContext>,
    pub navigator: Arc<dyn Navigator>,
    pub prompter: Arc<dyn Prompter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// No stored token; redirected to login without touching the backend.
    NoSession,
    /// Stored role is not `security`; alerted and redirected.
    AccessDenied,
    /// A loader hit a 401 during the initial load.
    SessionExpired,
    /// The screen was unmounted before the initial load finished.
    Unmounted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Loader {
    Profile,
    TeamLocation,
    NearbyData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadStatus {
    Loaded,
    SoftFailed,
    /// This call hit a 401 and ended the session.
    SessionEnded,
    /// Skipped: the screen is unmounted or the session already ended.
    Inactive,
}

pub struct SecurityHome {
    inner: Arc<Inner>,
    poller: Mutex<Option<PollHandle>>,
}

struct Inner {
    deps: Dependencies,
    poll_interval: Duration,
    state: RwLock<DashboardState>,
    session_ended: AtomicBool,
    disposed: AtomicBool,
    searching: AtomicBool,
}

impl SecurityHome {
    pub fn new(deps: Dependencies) -> Self {
        Self::with_poll_interval(deps, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(deps: Dependencies, poll_interval: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                deps,
                poll_interval,
                state: RwLock::new(DashboardState::default()),
                session_ended: AtomicBool::new(false),
                disposed: AtomicBool::new(false),
                searching: AtomicBool::new(false),
            }),
            poller: Mutex::new(None),
        }
    }

    /// Guard the session, run the initial loads and start polling.
    pub async fn mount(&self) -> MountOutcome {
        if let Err(outcome) = self.inner.guard().await {
            return outcome;
        }

        for loader in [Loader::Profile, Loader::TeamLocation, Loader::NearbyData] {
            match self.inner.load(loader).await {
                LoadStatus::Loaded | LoadStatus::SoftFailed => {}
                LoadStatus::SessionEnded => return MountOutcome::SessionExpired,
                LoadStatus::Inactive => return self.inner.inactive_outcome(),
            }
        }

        if self.inner.is_inactive() {
            return self.inner.inactive_outcome();
        }

        let inner = self.inner.clone();
        let handle = PollHandle::spawn(self.inner.poll_interval, move || {
            let inner = inner.clone();
            async move {
                match inner.load(Loader::NearbyData).await {
                    LoadStatus::Loaded | LoadStatus::SoftFailed => ControlFlow::Continue(()),
                    LoadStatus::SessionEnded | LoadStatus::Inactive => ControlFlow::Break(()),
                }
            }
        });

        let previous = self.poller.lock().await.replace(handle);
        if let Some(previous) = previous {
            previous.stop().await;
        }

        info!(
            interval_secs = self.inner.poll_interval.as_secs(),
            "Security dashboard mounted"
        );
        MountOutcome::Mounted
    }

    /// Stop polling and discard any result that is still in flight.
    pub async fn unmount(&self) {
        self.inner.disposed.store(true, Ordering::SeqCst);
        self.stop_polling().await;
        debug!("Security dashboard unmounted");
    }

    /// Pull-to-refresh: reload team location and nearby data.
    pub async fn refresh(&self) -> Result<(), DashboardError> {
        self.inner.set_refreshing(true).await;

        let mut result = Ok(());
        for loader in [Loader::TeamLocation, Loader::NearbyData] {
            match self.inner.load(loader).await {
                LoadStatus::Loaded => {}
                LoadStatus::SoftFailed => {
                    warn!(?loader, "Refresh left stale data");
                }
                LoadStatus::SessionEnded => {
                    result = Err(DashboardError::AuthExpired);
                    break;
                }
                LoadStatus::Inactive => {
                    if self.inner.session_ended.load(Ordering::SeqCst) {
                        result = Err(DashboardError::AuthExpired);
                    }
                    break;
                }
            }
        }

        self.inner.set_refreshing(false).await;
        if result.is_err() {
            self.stop_polling().await;
        }
        result
    }

    /// Look a user up by phone or email and open the tracking screen.
    #[instrument(skip(self, input))]
    pub async fn search(&self, input: &str) -> Result<UserRecord, DashboardError> {
        if self.inner.is_inactive() {
            debug!("Search ignored, dashboard is no longer active");
            return Err(DashboardError::Inactive);
        }

        let request = SearchRequest::from_input(input);
        if let Err(errors) = request.validate() {
            debug!(%errors, "Search input rejected");
            let message = EMPTY_SEARCH_MESSAGE.to_string();
            self.inner
                .deps
                .prompter
                .alert(Alert::validation(message.clone()))
                .await;
            return Err(DashboardError::Validation(message));
        }

        if self.inner.searching.swap(true, Ordering::SeqCst) {
            debug!("Search ignored, another one is in flight");
            return Err(DashboardError::Busy);
        }
        self.inner.state.write().await.searching = true;

        let result = self.inner.dispatch_search(&request).await;

        self.inner.searching.store(false, Ordering::SeqCst);
        self.inner.state.write().await.searching = false;

        match result {
            Ok(_) if self.inner.is_inactive() => {
                debug!("Dropping search result that arrived after teardown");
                Err(DashboardError::Inactive)
            }
            Ok(record) => {
                let user_data = serde_json::to_string(&record)
                    .map_err(|e| DashboardError::Transient(ApiError::Decode(e.to_string())))?;
                info!(user_id = %record.user_id, "User found, opening tracker");
                self.inner.deps.navigator.push(Route::UserTrack { user_data });
                Ok(record)
            }
            Err(DashboardError::AuthExpired) => {
                self.inner.end_session(true).await;
                self.stop_polling().await;
                Err(DashboardError::AuthExpired)
            }
            Err(err @ DashboardError::Session(_)) => {
                warn!(error = %err, "Session storage unavailable during search");
                Err(err)
            }
            Err(err) => {
                let detail = match &err {
                    DashboardError::NotFound(detail) => detail.clone(),
                    DashboardError::Transient(api) => api.detail().map(str::to_string),
                    _ => None,
                };
                warn!(error = %err, "Search failed");
                self.inner
                    .deps
                    .prompter
                    .alert(Alert::not_found(detail.as_deref()))
                    .await;
                Err(err)
            }
        }
    }

    /// Ask for confirmation, then drop the session and go to login.
    ///
    /// Returns `false` when the agent cancels. No backend call is made.
    pub async fn logout(&self) -> Result<bool, DashboardError> {
        if !self
            .inner
            .deps
            .prompter
            .confirm(Alert::confirm_logout())
            .await
        {
            return Ok(false);
        }

        self.inner.session_ended.store(true, Ordering::SeqCst);
        self.stop_polling().await;
        let cleared = self.inner.deps.session.clear().await;
        self.inner.deps.navigator.replace(Route::Login);
        cleared?;

        info!("Agent logged out");
        Ok(true)
    }

    pub fn open_nearby(&self) {
        self.inner.deps.navigator.push(Route::Nearby);
    }

    pub fn open_chat(&self) {
        self.inner.deps.navigator.push(Route::Chat);
    }

    pub fn open_settings(&self) {
        self.inner.deps.navigator.push(Route::Settings);
    }

    pub fn open_set_location(&self) {
        self.inner.deps.navigator.push(Route::SetLocation);
    }

    /// Panic list, or a single panic when `panic_id` is given.
    pub fn open_panics(&self, panic_id: Option<&str>) {
        self.inner.deps.navigator.push(Route::Panics {
            panic_id: panic_id.map(str::to_string),
        });
    }

    /// Report list, or a single report when `report_id` is given.
    pub fn open_reports(&self, report_id: Option<&str>) {
        self.inner.deps.navigator.push(Route::Reports {
            report_id: report_id.map(str::to_string),
        });
    }

    pub async fn state(&self) -> DashboardState {
        self.inner.state.read().await.clone()
    }

    pub async fn view(&self) -> DashboardView {
        DashboardView::build(&*self.inner.state.read().await, Utc::now())
    }

    pub async fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    async fn stop_polling(&self) {
        let handle = self.poller.lock().await.take();
        if let Some(handle) = handle {
            handle.stop().await;
        }
    }
}

impl Inner {
    fn is_inactive(&self) -> bool {
        self.disposed.load(Ordering::SeqCst) || self.session_ended.load(Ordering::SeqCst)
    }

    fn inactive_outcome(&self) -> MountOutcome {
        if self.session_ended.load(Ordering::SeqCst) {
            MountOutcome::SessionExpired
        } else {
            MountOutcome::Unmounted
        }
    }

    async fn guard(&self) -> Result<(), MountOutcome> {
        let session = match self.deps.session.get().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                info!("No stored session, redirecting to login");
                self.deps.navigator.replace(Route::Login);
                return Err(MountOutcome::NoSession);
            }
            Err(e) => {
                warn!(error = %e, "Session storage unreadable, redirecting to login");
                self.deps.navigator.replace(Route::Login);
                return Err(MountOutcome::NoSession);
            }
        };

        let authorized = session
            .metadata
            .as_ref()
            .is_some_and(|metadata| metadata.is_security());
        if !authorized {
            warn!(
                role = ?session.metadata.as_ref().and_then(|m| m.role),
                "Non-security role tried to open the dashboard"
            );
            self.deps.prompter.alert(Alert::access_denied()).await;
            self.deps.navigator.replace(Route::Login);
            return Err(MountOutcome::AccessDenied);
        }

        Ok(())
    }

    async fn token(&self) -> Result<Secret<String>, DashboardError> {
        match self.deps.session.get().await? {
            Some(session) => Ok(session.token),
            None => Err(DashboardError::AuthExpired),
        }
    }

    /// Run one loader and settle its error: 401 ends the session, anything
    /// else is logged and leaves the previous state in place.
    #[instrument(skip(self))]
    async fn load(&self, loader: Loader) -> LoadStatus {
        if self.is_inactive() {
            return LoadStatus::Inactive;
        }

        let result = match loader {
            Loader::Profile => self.load_profile().await,
            Loader::TeamLocation => self.load_team_location().await,
            Loader::NearbyData => self.load_nearby_data().await,
        };

        match result {
            Ok(()) => LoadStatus::Loaded,
            Err(DashboardError::AuthExpired) => {
                self.end_session(false).await;
                LoadStatus::SessionEnded
            }
            Err(err) => {
                warn!(?loader, error = %err, "Loader failed, keeping previous data");
                LoadStatus::SoftFailed
            }
        }
    }

    async fn load_profile(&self) -> Result<(), DashboardError> {
        let token = self.token().await?;
        let profile = self.deps.api.profile(&token).await?;

        if !self.is_inactive() {
            self.state.write().await.first_name = profile.first_name();
        }
        Ok(())
    }

    async fn load_team_location(&self) -> Result<(), DashboardError> {
        let token = self.token().await?;
        let location = self.deps.api.team_location(&token).await?;

        if location.is_unset() {
            info!("Team location has not been configured");
        }
        if !self.is_inactive() {
            self.state.write().await.team_location = Some(location);
        }
        Ok(())
    }

    /// Both lists are fetched concurrently and committed together; a failure
    /// on either side leaves both untouched.
    async fn load_nearby_data(&self) -> Result<(), DashboardError> {
        let token = self.token().await?;
        let (panics, reports) = tokio::try_join!(
            self.deps.api.nearby_panics(&token),
            self.deps.api.nearby_reports(&token),
        )?;

        if self.is_inactive() {
            debug!("Dropping nearby data fetched after teardown");
            return Ok(());
        }

        debug!(
            panics = panics.len(),
            reports = reports.len(),
            "Nearby data refreshed"
        );
        let mut state = self.state.write().await;
        state.panics = panics;
        state.reports = reports;
        state.last_synced_at = Some(Utc::now());
        Ok(())
    }

    async fn dispatch_search(&self, request: &SearchRequest) -> Result<UserRecord, DashboardError> {
        let token = self.token().await?;
        Ok(self.deps.api.search_user(&token, request).await?)
    }

    /// Clear the session and redirect to login, once per screen.
    async fn end_session(&self, notify: bool) {
        if self.session_ended.swap(true, Ordering::SeqCst) {
            return;
        }

        warn!("Session rejected by backend, forcing re-login");
        if notify {
            self.deps.prompter.alert(Alert::session_expired()).await;
        }
        if let Err(e) = self.deps.session.clear().await {
            warn!(error = %e, "Failed to clear session storage");
        }
        self.deps.navigator.replace(Route::Login);
    }

    async fn set_refreshing(&self, refreshing: bool) {
        self.state.write().await.refreshing = refreshing;
    }
}
