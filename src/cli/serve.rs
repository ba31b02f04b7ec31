//! Gateway command handler.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::warn;

use scanbrief::analysis::Analyzer;
use scanbrief::config::Config;
use scanbrief::providers::FAMILY_REGISTRY;

/// Start the HTTP gateway.
pub(crate) async fn cmd_serve(
    mut config: Config,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.gateway.host = host;
    }
    if let Some(port) = port {
        config.gateway.port = port;
    }

    for spec in FAMILY_REGISTRY {
        if config.credential(spec.family).is_none() {
            warn!(
                provider = spec.display_name,
                env = spec.credential_env,
                "No credential configured; requests for these models will fail"
            );
        }
    }

    let analyzer = Analyzer::from_config(&config).context("Failed to build analyzer")?;

    println!(
        "Listening on http://{}:{}",
        config.gateway.host, config.gateway.port
    );

    scanbrief::gateway::serve(Arc::new(analyzer), &config.gateway)
        .await
        .context("Gateway failed")?;

    Ok(())
}
