//! Cross-context notification ports.
//!
//! Each port hands out an inbound channel. Dropping the receiver detaches the
//! listener, so a consumer holds listeners open exactly as long as it keeps the
//! receivers alive.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::errors::TransportError;

/// A storage write performed by another context of the same profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub new_value: Option<String>,
}

/// Message posted on the broadcast channel by `SignalBus::emit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalMessage {
    pub key: String,
    pub at: i64,
    /// Context id of the sender.
    pub origin: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Native storage-change notifications. Writes made by the listening context
/// itself are never delivered to it.
pub trait StorageEventsPort: Send + Sync {
    fn watch(&self) -> Result<mpsc::UnboundedReceiver<StorageChange>, TransportError>;
}

/// Same-origin broadcast channel. Posting never delivers to the poster.
pub trait BroadcastChannelPort: Send + Sync {
    fn post(&self, message: &SignalMessage) -> Result<(), TransportError>;
    fn listen(&self) -> Result<mpsc::UnboundedReceiver<SignalMessage>, TransportError>;
}

/// Visibility transitions of the listening context.
pub trait VisibilityPort: Send + Sync {
    fn watch(&self) -> Result<mpsc::UnboundedReceiver<Visibility>, TransportError>;
}
