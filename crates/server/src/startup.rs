use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes;
use crate::state::AppState;
use service::Backends;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Router wired to the backends `cfg` selects.
pub fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let backends = Backends::from_config(&cfg.backend)?;
    Ok(routes::build_router(AppState::new(backends), &cfg.server.static_dir, build_cors()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(service = "server", event = "signal_error", error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "server", event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_static_dir(&cfg.server.static_dir).await;
    let app = build_app(&cfg)?;

    let listener = TcpListener::bind((cfg.server.host.as_str(), cfg.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(service = "server", event = "listening", %addr, backend = ?cfg.backend.mode, "http server listening");

    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}
