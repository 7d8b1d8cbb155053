pub mod analyzer;
pub mod config;
pub mod error;
pub mod parser;
pub mod source;
pub mod state;

use std::sync::Arc;

use config::AppConfig;
use error::AppError;
use source::{
    AuthProvider, ClientCredentialsProvider, FixtureTicketSource, HttpTicketSource,
    StaticTokenProvider, TicketSource,
};
use state::{DashboardController, LoadState};

/// Placeholder bearer for fixture runs; the fixture source ignores it.
const FIXTURE_TOKEN: &str = "local-fixture";

/// Builds the identity provider and ticket source described by `config`.
///
/// One `reqwest::Client` is created here and handed to both collaborators;
/// nothing is kept in module-level state.
pub fn build_collaborators(
    config: &AppConfig,
) -> Result<(Arc<dyn AuthProvider>, Arc<dyn TicketSource>), AppError> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("dash_tickets/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let source: Arc<dyn TicketSource> = match &config.fixture_path {
        Some(path) => Arc::new(FixtureTicketSource::new(path)),
        None => Arc::new(HttpTicketSource::from_config(client.clone(), config)?),
    };

    let auth: Arc<dyn AuthProvider> = match (&config.access_token, &config.fixture_path) {
        (Some(token), _) => Arc::new(StaticTokenProvider::new(token)),
        (None, Some(_)) => Arc::new(StaticTokenProvider::new(FIXTURE_TOKEN)),
        (None, None) => Arc::new(ClientCredentialsProvider::from_config(client, config)?),
    };

    Ok((auth, source))
}

/// Loads tickets once with the configured filters and prints the dashboard
/// view as JSON on stdout. Returns false when the load failed; the failure
/// itself is printed instead of the view.
pub async fn run() -> Result<bool, AppError> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    let config = AppConfig::from_env();
    let (auth, source) = build_collaborators(&config)?;
    let mut controller = DashboardController::from_config(auth, source, &config);

    if let LoadState::Failed(failure) = controller.load().await {
        println!("{}", serde_json::to_string_pretty(failure)?);
        return Ok(false);
    }

    let view = controller.view();
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(true)
}

// ─── End-to-end Tests ───────────────────────────────────────────────────────
