//! # ideaboard-server
//!
//! Community idea board API.
//!
//! This binary provides:
//! - **REST API** (axum) under `/api` for accounts, ideas, comments, likes
//!   and the activity feed
//! - **SQLite persistence** through a per-operation database gateway
//! - **Per-IP rate limiting** to protect against abuse

use tracing::info;
use tracing_subscriber::EnvFilter;

use ideaboard_server::api::{self, AppState};
use ideaboard_server::config::ServerConfig;
use ideaboard_server::gateway::Gateway;
use ideaboard_server::services::accounts;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,ideaboard_server=debug")),
        )
        .init();

    info!("Starting idea board server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load and check configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");
    if let Err(reason) = config.validate() {
        anyhow::bail!("invalid configuration: {reason}");
    }

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------

    // Runs migrations before the first request
    let gateway = Gateway::open(config.database_path.clone())?;

    if let Some((username, password)) = config.bootstrap_founder.clone() {
        let created = gateway
            .run(move |db| accounts::bootstrap_founder(db, &username, &password))
            .await?;
        if created {
            info!("Bootstrap founder account created");
        }
    }

    let http_addr = config.http_addr;
    let app_state = AppState::new(config, gateway);

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------

    // Periodic rate limiter cleanup (every 5 minutes, evict buckets idle
    // longer than a full window)
    let rl = app_state.rate_limiter.clone();
    let max_idle = std::time::Duration::from_secs(app_state.config.rate_limit_window_secs);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rl.purge_stale(max_idle).await;
        }
    });

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
