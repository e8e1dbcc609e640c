use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use taxomerge::error::{Result, TaxomergeError};
use taxomerge::server::{AppState, router};
use taxomerge::settings::Settings;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(e) = run().await {
        error!(error = %e, "taxomerge stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // the only argument is an optional settings file
    let settings_file = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_file.as_deref())?;
    info!(
        data_dir = %settings.taxonomy.data_dir.display(),
        files = settings.taxonomy.files.len(),
        listen = %settings.server.listen,
        "starting"
    );

    let listen = settings.server.listen.clone();
    let state = Arc::new(AppState::new(settings)?);

    // warm the cache in the background; requests wait for the same load
    let warming = Arc::clone(&state);
    tokio::spawn(async move {
        if let Err(e) = warming.cache.get().await {
            warn!(error = %e, "initial taxonomy load failed");
        }
    });

    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!(%listen, "listening");
    axum::serve(listener, router(state))
        .await
        .map_err(|e| TaxomergeError::Transport(e.to_string()))
}
