use anyhow::Context;
use cache22_server::{stop_channel, Cache22Server, ServerConfig};
use tracing::{info, warn};

use crate::cli::Cli;

/// Start the server and serve until Ctrl-C or a fatal accept error.
pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let listening = Cache22Server::new(config)
        .bind()
        .await
        .context("cannot start Cache22 server")?;

    let (signal, token) = stop_channel();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("interrupt received, shutting down");
                signal.stop();
            }
            Err(e) => warn!(error = %e, "cannot listen for Ctrl-C"),
        }
    });

    listening.serve(token).await?;
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<ServerConfig> {
    let mut config = match &cli.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(ip) = cli.bind {
        config.bind_addr.set_ip(ip);
    }
    if let Some(port) = cli.port {
        config.bind_addr.set_port(port);
    }
    if let Some(isolation) = cli.isolation {
        config.isolation = isolation.into();
    }
    if let Some(lookup) = cli.lookup {
        config.lookup = lookup.into();
    }
    Ok(config)
}
