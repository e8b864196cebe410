use std::sync::mpsc::Sender;

use crate::app_event::AppEvent;

/// Cloneable handle for posting events to the app loop. Send failures are
/// swallowed and logged: they only happen during shutdown, when the receiver
/// is already gone.
#[derive(Clone, Debug)]
pub struct AppEventSender {
    tx: Sender<AppEvent>,
}

impl AppEventSender {
    pub fn new(tx: Sender<AppEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: AppEvent) {
        if let Err(err) = self.tx.send(event) {
            tracing::error!("failed to send app event: {err}");
        }
    }
}
