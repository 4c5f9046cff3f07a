//! apexporter
//!
//! Polls the Apex Legends stats API on a fixed interval and serves the
//! extracted values at `/metrics` for Prometheus.

use std::process::ExitCode;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::{fmt, EnvFilter};

use apexporter_core::error::{ExporterError, Result};
use apexporter_server::config::{self, ExporterConfig};
use apexporter_server::obs::ApexMetrics;
use apexporter_server::poll::Poller;
use apexporter_server::upstream::MozambiqueClient;
use apexporter_server::{app_state, router};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    tracing::info!("starting exporter");

    let cfg = match config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(config = ?cfg, "configuration loaded");

    match run(cfg).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "exporter stopped");
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins; `LOG_LEVEL` is the simpler knob; default `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            let level = std::env::var("LOG_LEVEL")
                .ok()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| "info".into());
            EnvFilter::try_new(level.trim().to_ascii_lowercase())
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();
}

async fn run(cfg: ExporterConfig) -> Result<()> {
    let listen = cfg.exporter.listen_addr()?;
    let client = MozambiqueClient::from_config(&cfg)?;
    let metrics = Arc::new(ApexMetrics::default());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let poller = Poller::new(
        Arc::new(client),
        Arc::clone(&metrics),
        cfg.exporter.poll_interval(),
        cfg.exporter.exit_on_poll_error,
    );
    let mut poll_task = tokio::spawn(poller.run(shutdown_rx.clone()));

    let state = app_state::AppState::new(Arc::clone(&metrics));
    let app = router::build_router(state);

    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| ExporterError::Internal(format!("bind {listen} failed: {e}")))?;
    tracing::info!(%listen, platform = %cfg.platform, "apexporter listening");

    let mut server_shutdown = shutdown_rx;
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = server_shutdown.wait_for(|stop| *stop).await;
            })
            .await
    });

    let mut poll_done = false;
    let outcome = tokio::select! {
        _ = shutdown_signal() => {
            tracing::info!("signal received, starting graceful shutdown");
            Ok(())
        }
        res = &mut poll_task => {
            poll_done = true;
            res.map_err(|e| ExporterError::Internal(format!("poll task failed: {e}")))
                .and_then(|r| r)
        }
    };

    metrics.set_draining();
    let _ = shutdown_tx.send(true);
    if !poll_done {
        let _ = poll_task.await;
    }
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "metrics server failed"),
        Err(e) => tracing::error!(error = %e, "metrics server task failed"),
    }
    outcome
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
