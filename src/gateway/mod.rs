//! HTTP gateway
//!
//! A thin axum front for the analyzer: a status document, the model listing
//! and `POST /summarize`. The adapter itself stays HTTP-agnostic; this module
//! only maps its results and errors onto JSON responses.

pub mod routes;

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use crate::analysis::Analyzer;
use crate::config::GatewayConfig;
use crate::error::Result;

pub use routes::{create_router, MAX_BODY_BYTES};

/// Bind `config.host:config.port` and serve until Ctrl+C or SIGTERM.
pub async fn serve(analyzer: Arc<Analyzer>, config: &GatewayConfig) -> Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    info!(
        %addr,
        default_model = analyzer.catalog().default_key(),
        "Gateway listening"
    );

    axum::serve(listener, create_router(analyzer))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}
