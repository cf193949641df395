// File: src/main.rs
// Purpose: wikid entry point: logging, configuration, listener

use anyhow::{Context, Result};
use tracing::{error, info};
use wiki::{router, AppState, Config};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let addr = config.server.resolve().await?;

    let state = AppState::from_config(&config).context("Failed to load templates")?;
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
