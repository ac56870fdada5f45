//! Implementation of the `capsync serve` command.

use anyhow::Result;
use clap::Args;
use std::sync::Arc;
use tracing::{info, warn};

use crate::adapters::http::TriggerServer;
use crate::domain::models::Config;
use crate::infrastructure::setup::build_run_service;

/// Arguments for `capsync serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Serve the HTTP trigger until Ctrl-C.
pub async fn execute(args: ServeArgs, mut config: Config) -> Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let service = Arc::new(build_run_service(&config)?);
    TriggerServer::new(service, config.server)
        .serve_with_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => warn!(error = %e, "failed to listen for ctrl-c, serving until killed"),
    }
}
