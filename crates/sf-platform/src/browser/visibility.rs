use std::sync::Mutex;

use sf_core::ports::{TransportError, Visibility, VisibilityPort};
use tokio::sync::mpsc;

use super::profile::lock;

/// Visibility of one context; listeners hear transitions only.
pub(crate) struct VisibilityController {
    state: Mutex<Visibility>,
    listeners: Mutex<Vec<mpsc::UnboundedSender<Visibility>>>,
}

impl Default for VisibilityController {
    fn default() -> Self {
        Self {
            state: Mutex::new(Visibility::Visible),
            listeners: Mutex::new(Vec::new()),
        }
    }
}

impl VisibilityController {
    pub(crate) fn set(&self, visibility: Visibility) {
        {
            let mut state = lock(&self.state);
            if *state == visibility {
                return;
            }
            *state = visibility;
        }
        lock(&self.listeners).retain(|tx| tx.send(visibility).is_ok());
    }
}

impl VisibilityPort for VisibilityController {
    fn watch(&self) -> Result<mpsc::UnboundedReceiver<Visibility>, TransportError> {
        let (tx, rx) = mpsc::unbounded_channel();
        lock(&self.listeners).push(tx);
        Ok(rx)
    }
}
