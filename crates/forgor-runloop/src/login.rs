//! Rate-limited login prompts.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use forgor_protocols::UiNotification;

use crate::bus::NotificationBus;

/// Opens the login surface at most once per cooldown window.
pub struct LoginPrompter {
    bus: NotificationBus,
    cooldown: Duration,
    last_prompt: Mutex<Option<Instant>>,
}

impl LoginPrompter {
    pub fn new(bus: NotificationBus, cooldown: Duration) -> Self {
        Self {
            bus,
            cooldown,
            last_prompt: Mutex::new(None),
        }
    }

    /// Publish `OPEN_LOGIN` unless a prompt went out within the cooldown.
    pub fn prompt(&self) -> bool {
        {
            let mut last = self.last_prompt.lock();
            if last.is_some_and(|at| at.elapsed() < self.cooldown) {
                debug!("Login prompt suppressed");
                return false;
            }
            *last = Some(Instant::now());
        }
        info!("Prompting for login");
        self.bus.publish(UiNotification::OpenLogin);
        true
    }

    pub fn reset(&self) {
        *self.last_prompt.lock() = None;
    }
}
