use std::sync::Arc;

use crate::chat::Session;
use crate::core::AppConfig;
use crate::net::{CancelHandle, Transport};

pub struct AppState {
    // One conversation per server
    pub session: Session,
    pub transport: Arc<dyn Transport>,
    // Fires the token of the send currently awaiting the transport
    pub active_cancel: Option<CancelHandle>,
}

impl AppState {
    pub fn new(config: &AppConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            session: Session::from_config(config),
            transport,
            active_cancel: None,
        }
    }

    /// Returns false when nothing was in flight.
    pub fn cancel_active(&mut self) -> bool {
        match self.active_cancel.take() {
            Some(handle) => {
                handle.cancel();
                true
            }
            None => false,
        }
    }
}
