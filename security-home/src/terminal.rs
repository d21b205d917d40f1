//! Line-oriented host for running the dashboard in a terminal.

use crate::navigation::{Navigator, Route};
use crate::prompt::{Alert, Prompter};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::{watch, Mutex};

pub type SharedInput = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> SharedInput {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

/// Publishes every navigation on a watch channel so the command loop can
/// react to redirects (e.g. back to login).
pub struct TerminalNavigator {
    current: watch::Sender<Option<Route>>,
}

impl TerminalNavigator {
    pub fn new() -> (Self, watch::Receiver<Option<Route>>) {
        let (current, receiver) = watch::channel(None);
        (Self { current }, receiver)
    }

    fn announce(&self, kind: &str, route: Route) {
        tracing::info!(route = %route, kind, "Navigating");
        println!("→ {}", route);
        self.current.send_replace(Some(route));
    }
}

impl Navigator for TerminalNavigator {
    fn replace(&self, route: Route) {
        self.announce("replace", route);
    }

    fn push(&self, route: Route) {
        self.announce("push", route);
    }
}

/// Alerts go to stdout; confirmations read a y/N answer from the shared input.
pub struct TerminalPrompter {
    input: SharedInput,
}

impl TerminalPrompter {
    pub fn new(input: SharedInput) -> Self {
        Self { input }
    }
}

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn alert(&self, alert: Alert) {
        println!("[{}] {}", alert.title, alert.message);
    }

    async fn confirm(&self, alert: Alert) -> bool {
        println!("[{}] {} [y/N]", alert.title, alert.message);
        match self.input.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// A parsed command-loop instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Show,
    Refresh,
    Search(String),
    Panics(Option<String>),
    Reports(Option<String>),
    Nearby,
    Chat,
    Settings,
    SetLocation,
    Logout,
    Quit,
    Help,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        Some(match verb.to_ascii_lowercase().as_str() {
            "show" | "s" => Command::Show,
            "refresh" | "r" => Command::Refresh,
            "search" => Command::Search(rest.to_string()),
            "panics" => Command::Panics(argument),
            "reports" => Command::Reports(argument),
            "nearby" => Command::Nearby,
            "chat" => Command::Chat,
            "settings" => Command::Settings,
            "set-location" => Command::SetLocation,
            "logout" => Command::Logout,
            "quit" | "exit" | "q" => Command::Quit,
            "help" | "?" => Command::Help,
            other => Command::Unknown(other.to_string()),
        })
    }
}

pub const HELP: &str = "\
Commands:
  show                 redraw the dashboard
  refresh              reload team location and nearby data
  search <phone|email> find and track a user
  panics [id]          open the panic list or one panic
  reports [id]         open the report list or one report
  nearby | chat | settings | set-location
  logout               end the session
  quit                 leave without logging out";
