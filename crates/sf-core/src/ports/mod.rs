//! Port interfaces for the application layer
//!
//! Ports define the contract between the draft-preview use cases and the
//! surrounding system: the content API, browser-profile storage, cross-context
//! messaging and the clock. Infrastructure and platform crates implement them;
//! the application layer only ever sees these traits.

mod app_dirs;
mod clock;
pub mod entity;
pub mod errors;
pub mod storage;
pub mod transport;

pub use app_dirs::AppDirsPort;
pub use clock::*;
pub use entity::{EntityReadPort, EntityWritePort, PhotoLookupPort};
pub use errors::{AppDirsError, EntityError, StorageError, TransportError};
pub use storage::KeyValueStoragePort;
pub use transport::{
    BroadcastChannelPort, SignalMessage, StorageChange, StorageEventsPort, Visibility,
    VisibilityPort,
};
