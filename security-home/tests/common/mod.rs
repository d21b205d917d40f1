//! Test doubles for driving the dashboard without a backend or a UI.
#![allow(dead_code)]

use async_trait::async_trait;
use secrecy::Secret;
use security_home::error::{ApiError, SessionError};
use security_home::models::{
    Panic, Report, ReportKind, Role, SearchRequest, TeamLocation, UserMetadata, UserProfile,
    UserRecord,
};
use security_home::navigation::{Navigator, Route};
use security_home::prompt::{Alert, Prompter};
use security_home::services::SecurityApi;
use security_home::session::{MemorySessionStore, SessionContext, StoredSession};
use security_home::{Dependencies, SecurityHome};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const POLL_INTERVAL: Duration = Duration::from_secs(30);
pub const AGENT_TOKEN: &str = "agent-token";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Profile,
    TeamLocation,
    NearbyPanics,
    NearbyReports,
    SearchUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Unauthorized,
    NotFound(Option<String>),
    Unavailable,
}

pub fn panic(id: &str) -> Panic {
    Panic {
        id: id.to_string(),
        user_email: Some(format!("{id}@example.com")),
        activated_at: "2024-03-01T10:00:00Z".to_string(),
        user_name: None,
        user_phone: None,
        latitude: Some(6.52),
        longitude: Some(3.37),
    }
}

pub fn report(id: &str, kind: ReportKind) -> Report {
    Report {
        id: id.to_string(),
        kind,
        caption: None,
        user_email: None,
        created_at: None,
        file_url: None,
        latitude: None,
        longitude: None,
    }
}

/// In-memory backend with per-endpoint replies and call counters.
pub struct FakeApi {
    replies: Mutex<HashMap<Endpoint, Reply>>,
    calls: Mutex<HashMap<Endpoint, usize>>,
    tokens_seen: Mutex<Vec<String>>,
    pub full_name: Mutex<Option<String>>,
    pub location: Mutex<TeamLocation>,
    pub panics: Mutex<Vec<Panic>>,
    pub reports: Mutex<Vec<Report>>,
    pub last_search: Mutex<Option<SearchRequest>>,
    search_gate: Mutex<Option<Arc<Notify>>>,
    pub search_started: Notify,
    nearby_gate: Mutex<Option<Arc<Notify>>>,
    /// Notified when a held nearby-panics call reaches its gate.
    pub nearby_started: Notify,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(HashMap::new()),
            calls: Mutex::new(HashMap::new()),
            tokens_seen: Mutex::new(Vec::new()),
            full_name: Mutex::new(Some("Chidi Obi".to_string())),
            location: Mutex::new(TeamLocation {
                latitude: 6.5244,
                longitude: 3.3792,
                radius_km: 5.0,
            }),
            panics: Mutex::new(["p1", "p2", "p3", "p4", "p5"].into_iter().map(panic).collect()),
            reports: Mutex::new(vec![
                report("r1", ReportKind::Video),
                report("r2", ReportKind::Audio),
                report("r3", ReportKind::Video),
                report("r4", ReportKind::Audio),
            ]),
            last_search: Mutex::new(None),
            search_gate: Mutex::new(None),
            search_started: Notify::new(),
            nearby_gate: Mutex::new(None),
            nearby_started: Notify::new(),
        }
    }

    pub fn reply(&self, endpoint: Endpoint, reply: Reply) {
        self.replies.lock().unwrap().insert(endpoint, reply);
    }

    pub fn calls(&self, endpoint: Endpoint) -> usize {
        self.calls.lock().unwrap().get(&endpoint).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }

    /// Make searches wait until the returned gate is notified.
    pub fn hold_searches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.search_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Make the next nearby-panics calls wait until the returned gate is notified.
    pub fn hold_nearby(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.nearby_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    fn answer(&self, endpoint: Endpoint, token: &Secret<String>) -> Result<(), ApiError> {
        use secrecy::ExposeSecret;

        *self.calls.lock().unwrap().entry(endpoint).or_insert(0) += 1;
        self.tokens_seen
            .lock()
            .unwrap()
            .push(token.expose_secret().clone());

        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&endpoint)
            .cloned()
            .unwrap_or(Reply::Ok);

        match reply {
            Reply::Ok => Ok(()),
            Reply::Unauthorized => Err(ApiError::Unauthorized),
            Reply::NotFound(detail) => Err(ApiError::NotFound(detail)),
            Reply::Unavailable => Err(ApiError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                detail: None,
            }),
        }
    }
}

#[async_trait]
impl SecurityApi for FakeApi {
    async fn profile(&self, token: &Secret<String>) -> Result<UserProfile, ApiError> {
        self.answer(Endpoint::Profile, token)?;
        Ok(UserProfile {
            full_name: self.full_name.lock().unwrap().clone(),
        })
    }

    async fn team_location(&self, token: &Secret<String>) -> Result<TeamLocation, ApiError> {
        self.answer(Endpoint::TeamLocation, token)?;
        Ok(*self.location.lock().unwrap())
    }

    async fn nearby_panics(&self, token: &Secret<String>) -> Result<Vec<Panic>, ApiError> {
        let outcome = self.answer(Endpoint::NearbyPanics, token);

        let gate = self.nearby_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            self.nearby_started.notify_one();
            gate.notified().await;
        }

        outcome?;
        Ok(self.panics.lock().unwrap().clone())
    }

    async fn nearby_reports(&self, token: &Secret<String>) -> Result<Vec<Report>, ApiError> {
        self.answer(Endpoint::NearbyReports, token)?;
        Ok(self.reports.lock().unwrap().clone())
    }

    async fn search_user(
        &self,
        token: &Secret<String>,
        request: &SearchRequest,
    ) -> Result<UserRecord, ApiError> {
        *self.last_search.lock().unwrap() = Some(request.clone());
        let outcome = self.answer(Endpoint::SearchUser, token);
        self.search_started.notify_one();

        let gate = self.search_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        outcome?;
        Ok(serde_json::from_value(serde_json::json!({
            "user_id": "u-77",
            "full_name": "Ada Lovelace",
            "email": request.search_term,
            "phone": null,
            "last_seen": "2024-03-01T09:00:00Z"
        }))
        .unwrap())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nav {
    Replace,
    Push,
}

#[derive(Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<(Nav, Route)>>,
}

impl RecordingNavigator {
    pub fn history(&self) -> Vec<(Nav, Route)> {
        self.history.lock().unwrap().clone()
    }

    pub fn replaced(&self) -> Vec<Route> {
        self.routes(Nav::Replace)
    }

    pub fn pushed(&self) -> Vec<Route> {
        self.routes(Nav::Push)
    }

    fn routes(&self, kind: Nav) -> Vec<Route> {
        self.history()
            .into_iter()
            .filter(|(nav, _)| *nav == kind)
            .map(|(_, route)| route)
            .collect()
    }
}

impl Navigator for RecordingNavigator {
    fn replace(&self, route: Route) {
        self.history.lock().unwrap().push((Nav::Replace, route));
    }

    fn push(&self, route: Route) {
        self.history.lock().unwrap().push((Nav::Push, route));
    }
}

pub struct RecordingPrompter {
    alerts: Mutex<Vec<Alert>>,
    confirms: Mutex<Vec<Alert>>,
    answer: AtomicBool,
}

impl RecordingPrompter {
    pub fn answering(answer: bool) -> Self {
        Self {
            alerts: Mutex::new(Vec::new()),
            confirms: Mutex::new(Vec::new()),
            answer: AtomicBool::new(answer),
        }
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().unwrap().clone()
    }

    pub fn confirms(&self) -> Vec<Alert> {
        self.confirms.lock().unwrap().clone()
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }
}

#[async_trait]
impl Prompter for RecordingPrompter {
    async fn alert(&self, alert: Alert) {
        self.alerts.lock().unwrap().push(alert);
    }

    async fn confirm(&self, alert: Alert) -> bool {
        self.confirms.lock().unwrap().push(alert);
        self.answer.load(Ordering::SeqCst)
    }
}

/// Memory store that counts `clear` calls.
pub struct CountingSession {
    store: MemorySessionStore,
    clears: AtomicUsize,
}

impl CountingSession {
    pub fn new(session: Option<StoredSession>) -> Self {
        Self {
            store: session
                .map(MemorySessionStore::with_session)
                .unwrap_or_default(),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionContext for CountingSession {
    async fn get(&self) -> Result<Option<StoredSession>, SessionError> {
        self.store.get().await
    }

    async fn store(&self, session: StoredSession) -> Result<(), SessionError> {
        self.store.store(session).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.store.clear().await
    }
}

pub struct Harness {
    pub api: Arc<FakeApi>,
    pub session: Arc<CountingSession>,
    pub navigator: Arc<RecordingNavigator>,
    pub prompter: Arc<RecordingPrompter>,
    pub screen: Arc<SecurityHome>,
}

impl Harness {
    pub fn with_session(session: Option<StoredSession>) -> Self {
        let api = Arc::new(FakeApi::new());
        let session = Arc::new(CountingSession::new(session));
        let navigator = Arc::new(RecordingNavigator::default());
        let prompter = Arc::new(RecordingPrompter::answering(true));

        let screen = Arc::new(SecurityHome::with_poll_interval(
            Dependencies {
                api: api.clone(),
                session: session.clone(),
                navigator: navigator.clone(),
                prompter: prompter.clone(),
            },
            POLL_INTERVAL,
        ));

        Self {
            api,
            session,
            navigator,
            prompter,
            screen,
        }
    }

    pub fn security_agent() -> Self {
        Self::with_session(Some(StoredSession::new(
            AGENT_TOKEN,
            Some(UserMetadata::with_role(Role::Security)),
        )))
    }

    pub fn with_role(role: Role) -> Self {
        Self::with_session(Some(StoredSession::new(
            AGENT_TOKEN,
            Some(UserMetadata::with_role(role)),
        )))
    }

    pub fn logged_out() -> Self {
        Self::with_session(None)
    }
}
