//! Badge sinks for the binary.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use forgor_protocols::{BadgeError, BadgeSink};

use crate::host::HostOutput;

/// Forwards badge writes to the host channel as `badge` lines.
pub(crate) struct ChannelBadgeSink {
    tx: mpsc::UnboundedSender<HostOutput>,
}

impl ChannelBadgeSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<HostOutput>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl BadgeSink for ChannelBadgeSink {
    async fn set_badge(&self, text: &str, color: Option<&str>) -> Result<(), BadgeError> {
        self.tx
            .send(HostOutput::Badge {
                text: text.to_string(),
                color: color.map(str::to_string),
            })
            .map_err(|_| BadgeError::Unavailable("host channel closed".to_string()))
    }
}

/// Logs badge transitions; used by one-shot CLI commands.
pub(crate) struct LogBadgeSink;

#[async_trait]
impl BadgeSink for LogBadgeSink {
    async fn set_badge(&self, text: &str, _color: Option<&str>) -> Result<(), BadgeError> {
        if !text.is_empty() {
            info!("Badge: {}", text);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_sink_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = ChannelBadgeSink::new(tx);
        sink.set_badge("OK", Some("#32cd32")).await.unwrap();
        sink.clear_badge().await.unwrap();

        assert_eq!(
            rx.recv().await,
            Some(HostOutput::Badge {
                text: "OK".to_string(),
                color: Some("#32cd32".to_string()),
            })
        );
        assert_eq!(
            rx.recv().await,
            Some(HostOutput::Badge {
                text: String::new(),
                color: None,
            })
        );
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let sink = ChannelBadgeSink::new(tx);
        assert!(matches!(
            sink.set_badge("x", None).await,
            Err(BadgeError::Unavailable(_))
        ));
    }
}
