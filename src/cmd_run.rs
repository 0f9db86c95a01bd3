//! `forgor run` - serve the browser shell.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use forgor_config::Config;

use crate::context::build_session;
use crate::host::run_host;
use crate::sink::ChannelBadgeSink;

pub(crate) async fn run(config: Config) -> anyhow::Result<()> {
    let (tx, rx) = mpsc::unbounded_channel();
    let session = Arc::new(build_session(&config, Arc::new(ChannelBadgeSink::new(tx.clone())))?);
    info!("Serving host protocol against {}", config.server.base_url);

    if let Some(info) = session.tier().get_or_fetch().await {
        info!("Signed in on the {} tier", info.tier);
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => warn!("Failed to listen for Ctrl+C: {}", e),
        }
        signal_cancel.cancel();
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_host(session, stdin, stdout, tx, rx, cancel).await?;
    info!("Host loop stopped");
    Ok(())
}
