//! Preview change notification.

mod bus;
mod hook;

pub use bus::{
    normalize_keys, SignalBus, SignalCallback, SignalTransports, Subscription, WeakSignalBus,
    REFRESH_SIGNAL_KEY,
};
pub use hook::{PreviewSignal, SignalValue};
