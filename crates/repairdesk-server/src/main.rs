use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use repairdesk_core::config::Config;
use repairdesk_duckdb::DuckDbBackend;
use repairdesk_server::{app::build_app, state::AppState};

/// `repairdesk health`: probes `GET /health` on the configured port and exits
/// 0 on HTTP 200, 1 otherwise. Used as the container HEALTHCHECK.
fn run_health_check() -> ! {
    let port = std::env::var("REPAIRDESK_PORT").unwrap_or_else(|_| "3000".to_string());
    match ureq::get(&format!("http://localhost:{port}/health")).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

/// JSON logs; `RUST_LOG` refines the default `repairdesk=info`.
fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("repairdesk=info".parse()?),
        )
        .json()
        .init();
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::args().nth(1).as_deref() == Some("health") {
        run_health_check();
    }

    init_tracing()?;

    let cfg = Config::from_env().map_err(|e| anyhow::anyhow!(e))?;

    std::fs::create_dir_all(&cfg.data_dir)?;
    let db = DuckDbBackend::open(&cfg.db_path(), &cfg.duckdb_memory_limit)?;

    let addr = format!("0.0.0.0:{}", cfg.port);
    let state = Arc::new(AppState::new(db, cfg));
    let app = build_app(Arc::clone(&state));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, db = %state.config.db_path(), "Repair-shop reports listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down cleanly");
    Ok(())
}
