//! services/client/src/bin/docqa.rs

use docqa_client_lib::{
    adapters::{ConsoleConfirm, HtmlPage, HttpBackend},
    config::Config,
    error::AppError,
    shell::{self, AppState, HELP},
};
use docqa_client_core::ListOutcome;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), AppError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!("Configuration loaded. Backend at {}", config.api_root());

    // --- 2. Initialize Adapters ---
    let backend = Arc::new(HttpBackend::new(&config)?);
    let page = Arc::new(HtmlPage::new(config.snapshot_path.clone()));
    let confirm = Arc::new(ConsoleConfirm::new());
    if let Some(path) = &config.snapshot_path {
        info!("Writing the page to {} after every change.", path.display());
    }

    // --- 3. Build the Shared AppState ---
    let state = Arc::new(AppState::new(config.clone(), backend, page, confirm));

    // --- 4. Check the Backend & Load the Document List ---
    match state.backend.health().await {
        Ok(()) => info!("Backend is reachable."),
        Err(e) => warn!("Backend health check failed: {}", e),
    }
    match state.documents.refresh().await {
        ListOutcome::Listed(count) => info!("{} documents available.", count),
        ListOutcome::Empty => info!("No documents uploaded yet."),
        ListOutcome::Unavailable(e) => warn!("Could not load documents: {}", e),
    }

    // --- 5. Start the Shell ---
    println!("{}", HELP);
    shell::run(state, BufReader::new(tokio::io::stdin())).await?;

    Ok(())
}
