//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use clap::Args;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing::{debug, info, instrument};

use longcast_core::config::Config;

use crate::server::CastServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    // Stdio is the only transport
}

/// Serve MCP tools over stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    let tier = config.tier.unwrap_or_default();
    debug!(max_input_bytes = ?max_input_bytes, tier = tier.as_str(), "executing serve command");

    let server = CastServer::new()
        .with_max_input_bytes(max_input_bytes)
        .with_default_tier(tier);
    let service = server
        .serve(stdio())
        .await
        .context("failed to start MCP server")?;

    info!("MCP server ready on stdio");
    let reason = service
        .waiting()
        .await
        .context("MCP server stopped unexpectedly")?;
    info!(reason = ?reason, "MCP server stopped");

    Ok(())
}
