// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

use saaskart_policies::{load_policy_or_default, policy_config_path};
use saaskart_server::{build_router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = sigint.recv() => {}
                }
            }
            _ => {
                warn!("signal handlers unavailable; falling back to ctrl-c");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let config = ServerConfig::from_env();
    init_tracing(config.log_json);

    let policy = load_policy_or_default(&config.policy_root).map_err(|e| e.to_string())?;
    info!(
        policy = %policy_config_path(&config.policy_root).display(),
        default_limit = policy.search.default_limit,
        default_sort = %policy.search.default_sort,
        "search policy loaded"
    );
    if !config.db_path.is_file() {
        warn!(db = %config.db_path.display(), "database file not found; searches will fail until it exists");
    }

    let app = build_router(AppState::new(config.db_path.clone(), &policy));
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;
    info!(addr = %config.bind_addr, db = %config.db_path.display(), "saaskart-server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;
    info!("saaskart-server stopped");
    Ok(())
}
