//! Best-effort core → UI notifications.

use tokio::sync::broadcast;
use tracing::debug;

use forgor_protocols::UiNotification;

const DEFAULT_CAPACITY: usize = 64;

/// Broadcast bus for [`UiNotification`]s.
///
/// Publishing with no listener is not an error; slow listeners may miss
/// notifications once the channel capacity is exceeded.
#[derive(Clone)]
pub struct NotificationBus {
    sender: broadcast::Sender<UiNotification>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to whoever is listening. Returns the number of receivers reached.
    pub fn publish(&self, notification: UiNotification) -> usize {
        match self.sender.send(notification) {
            Ok(count) => count,
            Err(broadcast::error::SendError(notification)) => {
                debug!("No listener for {:?}", notification);
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiNotification> {
        self.sender.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
