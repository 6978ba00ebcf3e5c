//! `serve` command: run the HTTP API

use tracing::info;

use crate::api::create_router;
use crate::config::AppConfig;
use crate::infrastructure::logging::init_logging;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration, using defaults: {}", err);
        AppConfig::default()
    });

    init_logging(&config.logging);

    let state = crate::create_app_state_with_config(&config).await?;
    let router = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
