use client_core::observability::{init_tracing, shutdown_tracing};
use dotenvy::dotenv;
use security_home::config::{get_configuration, COMPONENT_NAME};
use security_home::navigation::Route;
use security_home::services::metrics::{get_metrics, init_metrics};
use security_home::services::ApiClient;
use security_home::session::FileSessionStore;
use security_home::terminal::{
    stdin_lines, Command, SharedInput, TerminalNavigator, TerminalPrompter, HELP,
};
use security_home::{Dependencies, MountOutcome, SecurityHome};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        COMPONENT_NAME,
        &configuration.telemetry.log_level,
        configuration.telemetry.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    let api = Arc::new(ApiClient::new(configuration.api.clone())?);
    let session = Arc::new(FileSessionStore::new(
        configuration.session.storage_path.clone(),
    ));
    let input = stdin_lines();
    let (navigator, mut routes) = TerminalNavigator::new();

    info!(
        backend = %api.base_url(),
        session_file = %session.path().display(),
        "Starting security-home"
    );

    let screen = SecurityHome::with_poll_interval(
        Dependencies {
            api,
            session,
            navigator: Arc::new(navigator),
            prompter: Arc::new(TerminalPrompter::new(input.clone())),
        },
        configuration.polling.interval(),
    );

    let outcome = screen.mount().await;
    let result = if outcome == MountOutcome::Mounted {
        println!("{}", screen.view().await);
        println!("{}", HELP);
        run(&screen, &input, &mut routes).await
    } else {
        info!(?outcome, "Dashboard was not mounted");
        Ok(())
    };

    screen.unmount().await;

    match get_metrics() {
        Ok(metrics) => debug!(%metrics, "Backend call metrics"),
        Err(e) => warn!("Failed to export metrics: {}", e),
    }
    shutdown_tracing();

    result
}

/// Read commands until quit, EOF, Ctrl-C, or a redirect to login.
async fn run(
    screen: &SecurityHome,
    input: &SharedInput,
    routes: &mut watch::Receiver<Option<Route>>,
) -> anyhow::Result<()> {
    loop {
        let line = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                return Ok(());
            }
            _ = routes.wait_for(|route| matches!(route, Some(Route::Login))) => {
                info!("Redirected to login, leaving dashboard");
                return Ok(());
            }
            line = async { input.lock().await.next_line().await } => line?,
        };

        let Some(line) = line else {
            return Ok(());
        };
        let Some(command) = Command::parse(&line) else {
            continue;
        };

        match command {
            Command::Show => println!("{}", screen.view().await),
            Command::Refresh => {
                if let Err(e) = screen.refresh().await {
                    warn!(error = %e, "Refresh failed");
                }
                println!("{}", screen.view().await);
            }
            Command::Search(term) => {
                if let Ok(record) = screen.search(&term).await {
                    println!("Tracking user {}", record.user_id);
                }
            }
            Command::Panics(id) => screen.open_panics(id.as_deref()),
            Command::Reports(id) => screen.open_reports(id.as_deref()),
            Command::Nearby => screen.open_nearby(),
            Command::Chat => screen.open_chat(),
            Command::Settings => screen.open_settings(),
            Command::SetLocation => screen.open_set_location(),
            Command::Logout => {
                if let Err(e) = screen.logout().await {
                    warn!(error = %e, "Logout could not clear the session");
                }
            }
            Command::Quit => return Ok(()),
            Command::Help => println!("{}", HELP),
            Command::Unknown(verb) => println!("Unknown command '{}'. Type 'help'.", verb),
        }
    }
}
