//! Preview signal: a change counter scoped to a set of notification keys.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

use super::bus::{normalize_keys, SignalBus, Subscription, WeakSignalBus};

/// Value of a preview signal. Two values differ iff a relevant notification
/// fired in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SignalValue(u64);

impl SignalValue {
    /// The constant value reported while disabled.
    pub const fn disabled() -> Self {
        SignalValue(0)
    }

    pub fn tick(&self) -> u64 {
        self.0
    }
}

/// Derives a [`SignalValue`] from [`SignalBus::snapshot`] for a fixed key set.
///
/// Disabled signals never subscribe, never change and never wake a waiter.
pub struct PreviewSignal {
    keys: Vec<String>,
    rx: Option<watch::Receiver<u64>>,
    subscription: Option<Subscription>,
}

impl PreviewSignal {
    pub fn new<I, K>(bus: &SignalBus, keys: I, enabled: bool) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys = normalize_keys(keys);
        if !enabled {
            return Self::disabled_with(keys);
        }

        let (tx, rx) = watch::channel(0u64);
        let last = Arc::new(Mutex::new(bus.snapshot(Some(&keys))));
        let weak: WeakSignalBus = bus.downgrade();
        let watched = keys.clone();

        let subscription = bus.subscribe(move || {
            let Some(bus) = weak.upgrade() else {
                return;
            };
            let current = bus.snapshot(Some(&watched));
            let mut last = last.lock().unwrap_or_else(PoisonError::into_inner);
            if *last != current {
                *last = current;
                tx.send_modify(|tick| *tick += 1);
            }
        });

        Self {
            keys,
            rx: Some(rx),
            subscription: Some(subscription),
        }
    }

    pub fn disabled<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::disabled_with(normalize_keys(keys))
    }

    fn disabled_with(keys: Vec<String>) -> Self {
        Self {
            keys,
            rx: None,
            subscription: None,
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    pub fn value(&self) -> SignalValue {
        match &self.rx {
            Some(rx) => SignalValue(*rx.borrow()),
            None => SignalValue::disabled(),
        }
    }

    /// Wait for the next relevant change and return the new value. Pending
    /// forever when disabled.
    pub async fn changed(&mut self) -> SignalValue {
        let Some(rx) = self.rx.as_mut() else {
            return std::future::pending().await;
        };
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
        let tick = *rx.borrow_and_update();
        SignalValue(tick)
    }
}
