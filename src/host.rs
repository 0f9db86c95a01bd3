//! Newline-delimited JSON host protocol.
//!
//! The browser shell writes one [`HostEvent`] per line on stdin and reads
//! one [`HostOutput`] per line from stdout. Malformed lines are logged and
//! skipped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use forgor_protocols::{
    BackgroundMessage, BackgroundResponse, TabChange, TabSnapshot, UiNotification,
};
use forgor_runloop::{InstallReason, MenuCommand, Session};

/// Errors that end the host loop.
#[derive(Debug, Error)]
pub(crate) enum HostError {
    #[error("Host I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode host output: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Event sent by the browser shell.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum HostEvent {
    TabActivated {
        tab: TabSnapshot,
    },
    TabUpdated {
        #[serde(default)]
        change: TabChange,
        tab: TabSnapshot,
    },
    Message {
        id: Value,
        message: BackgroundMessage,
    },
    ToolbarClicked,
    ContextMenu {
        command: MenuCommand,
    },
    Installed {
        reason: String,
    },
}

/// Line written back to the browser shell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub(crate) enum HostOutput {
    Badge {
        text: String,
        color: Option<String>,
    },
    Response {
        id: Value,
        response: BackgroundResponse,
    },
    Notify {
        notification: UiNotification,
    },
    ActionResult {
        ok: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        result: Option<Value>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

/// Serve `session` until EOF on `reader` or until `cancel` fires.
///
/// `outputs` is the receiving end of the channel the session's badge sink
/// writes into; everything sent on it ends up on `writer`.
pub(crate) async fn run_host<R, W>(
    session: Arc<Session>,
    reader: R,
    mut writer: W,
    tx: mpsc::UnboundedSender<HostOutput>,
    mut outputs: mpsc::UnboundedReceiver<HostOutput>,
    cancel: CancellationToken,
) -> Result<(), HostError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut notifications = session.bus().subscribe();
    let tracker = TaskTracker::new();
    info!("Host loop started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("Host loop cancelled");
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) => dispatch_line(&session, &tracker, &tx, &line),
                None => {
                    info!("Host closed stdin");
                    break;
                }
            },
            notification = notifications.recv() => match notification {
                Ok(notification) => {
                    let _ = tx.send(HostOutput::Notify { notification });
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Dropped {} notification(s)", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => {}
            },
            Some(output) = outputs.recv() => write_output(&mut writer, &output).await?,
        }
    }

    tracker.close();
    tracker.wait().await;
    while let Ok(notification) = notifications.try_recv() {
        let _ = tx.send(HostOutput::Notify { notification });
    }
    while let Ok(output) = outputs.try_recv() {
        write_output(&mut writer, &output).await?;
    }
    writer.flush().await?;
    Ok(())
}

async fn write_output<W: AsyncWrite + Unpin>(writer: &mut W, output: &HostOutput) -> Result<(), HostError> {
    let mut line = serde_json::to_string(output)?;
    line.push('\n');
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await?;
    Ok(())
}

fn dispatch_line(
    session: &Arc<Session>,
    tracker: &TaskTracker,
    tx: &mpsc::UnboundedSender<HostOutput>,
    line: &str,
) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    let event: HostEvent = match serde_json::from_str(line) {
        Ok(event) => event,
        Err(e) => {
            warn!("Skipping malformed host line: {}", e);
            return;
        }
    };
    debug!("Host event: {:?}", event);

    match event {
        HostEvent::TabActivated { tab } => {
            session.on_tab_activated(&tab);
        }
        HostEvent::TabUpdated { change, tab } => {
            session.on_tab_updated(&change, &tab);
        }
        HostEvent::Message { id, message } => {
            let session = session.clone();
            let tx = tx.clone();
            tracker.spawn(async move {
                let response = session.handle_message(message).await;
                let _ = tx.send(HostOutput::Response { id, response });
            });
        }
        HostEvent::ToolbarClicked => {
            let session = session.clone();
            tracker.spawn(async move {
                session.toolbar_clicked().await;
            });
        }
        HostEvent::ContextMenu { command } => {
            let session = session.clone();
            let tx = tx.clone();
            tracker.spawn(async move {
                let output = match session.on_context_menu(&command).await {
                    Ok(result) => HostOutput::ActionResult {
                        ok: true,
                        result: Some(result),
                        error: None,
                    },
                    Err(e) => HostOutput::ActionResult {
                        ok: false,
                        result: None,
                        error: Some(e.to_string()),
                    },
                };
                let _ = tx.send(output);
            });
        }
        HostEvent::Installed { reason } => {
            let session = session.clone();
            tracker.spawn(async move {
                session.on_installed(InstallReason::from(reason.as_str())).await;
            });
        }
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod tests;
