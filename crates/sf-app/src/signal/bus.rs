//! Cross-context change notification bus.
//!
//! An emit is delivered three ways: a timestamp written to a shared storage
//! slot (other contexts receive a native storage-change event), a broadcast
//! channel message, and a synchronous in-process notification (a context never
//! receives its own storage writes as events).
//!
//! Inbound transports are attached lazily: the first subscriber spawns one
//! forwarding task per source, all fanned into a single event channel drained
//! by one pump task. The last unsubscribe aborts them.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use serde::{Deserialize, Serialize};
use sf_core::ports::{
    BroadcastChannelPort, ClockPort, KeyValueStoragePort, SignalMessage, StorageChange,
    StorageEventsPort, Visibility, VisibilityPort,
};
use sf_core::preview::SIGNAL_SLOT_KEY;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace};

/// Notification key that re-derives every subscriber, regardless of keys.
pub const REFRESH_SIGNAL_KEY: &str = "preview.refresh";

pub type SignalCallback = Arc<dyn Fn() + Send + Sync>;

/// Transport endpoints of one browsing context.
#[derive(Clone)]
pub struct SignalTransports {
    pub storage: Arc<dyn KeyValueStoragePort>,
    pub storage_events: Arc<dyn StorageEventsPort>,
    pub channel: Arc<dyn BroadcastChannelPort>,
    pub visibility: Arc<dyn VisibilityPort>,
}

/// Payload of the shared storage slot.
#[derive(Debug, Serialize, Deserialize)]
struct SlotValue {
    key: String,
    at: i64,
}

enum SignalEvent {
    Storage(StorageChange),
    Message(SignalMessage),
    Visibility(Visibility),
}

/// Process-wide (per context) notification bus. Cloning shares the state.
#[derive(Clone)]
pub struct SignalBus {
    inner: Arc<BusInner>,
}

/// Non-owning handle, used by subscribers that need to read snapshots.
#[derive(Clone)]
pub struct WeakSignalBus {
    inner: Weak<BusInner>,
}

struct BusInner {
    context_id: String,
    clock: Arc<dyn ClockPort>,
    transports: Option<SignalTransports>,
    state: Mutex<BusState>,
}

#[derive(Default)]
struct BusState {
    generation: u64,
    versions: BTreeMap<String, u64>,
    any: u64,
    visibility: u64,
    refresh: u64,
    hidden: bool,
    subscribers: BTreeMap<u64, SignalCallback>,
    next_subscriber: u64,
    pump: Option<TransportPump>,
}

/// Attached inbound listeners; aborted on drop.
struct TransportPump {
    tasks: Vec<JoinHandle<()>>,
}

impl Drop for TransportPump {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl SignalBus {
    /// Bus with in-process delivery only.
    pub fn local(context_id: impl Into<String>, clock: Arc<dyn ClockPort>) -> Self {
        Self::build(context_id.into(), clock, None)
    }

    /// Bus that also publishes to and listens on the given transports.
    pub fn with_transports(
        context_id: impl Into<String>,
        clock: Arc<dyn ClockPort>,
        transports: SignalTransports,
    ) -> Self {
        Self::build(context_id.into(), clock, Some(transports))
    }

    fn build(
        context_id: String,
        clock: Arc<dyn ClockPort>,
        transports: Option<SignalTransports>,
    ) -> Self {
        Self {
            inner: Arc::new(BusInner {
                context_id,
                clock,
                transports,
                state: Mutex::new(BusState::default()),
            }),
        }
    }

    pub fn context_id(&self) -> &str {
        &self.inner.context_id
    }

    pub fn downgrade(&self) -> WeakSignalBus {
        WeakSignalBus {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Record that `key` changed now. Never fails; transport errors are
    /// swallowed and in-process subscribers are always notified.
    pub fn emit(&self, key: &str) {
        let at = self.inner.clock.now_ms();
        self.publish(key, at);
        self.inner.bump(Some(key));
    }

    /// Ask every subscriber, in every context, to re-derive.
    pub fn emit_refresh(&self) {
        self.emit(REFRESH_SIGNAL_KEY);
    }

    fn publish(&self, key: &str, at: i64) {
        let Some(transports) = &self.inner.transports else {
            return;
        };

        let slot = SlotValue {
            key: key.to_string(),
            at,
        };
        match serde_json::to_string(&slot) {
            Ok(raw) => {
                if let Err(err) = transports.storage.set(SIGNAL_SLOT_KEY, &raw) {
                    debug!(error = %err, key, "signal slot write failed");
                }
            }
            Err(err) => debug!(error = %err, key, "signal slot encode failed"),
        }

        let message = SignalMessage {
            key: key.to_string(),
            at,
            origin: self.inner.context_id.clone(),
        };
        if let Err(err) = transports.channel.post(&message) {
            debug!(error = %err, key, "signal broadcast failed");
        }
    }

    /// Register `callback`, invoked after every change this bus observes.
    pub fn subscribe(&self, callback: impl Fn() + Send + Sync + 'static) -> Subscription {
        let (id, needs_pump) = {
            let mut state = self.inner.lock();
            let id = state.next_subscriber;
            state.next_subscriber += 1;
            state.subscribers.insert(id, Arc::new(callback));
            (id, state.pump.is_none())
        };

        if needs_pump {
            let pump = self.inner.attach(&self.inner);
            let mut state = self.inner.lock();
            if state.pump.is_none() && !state.subscribers.is_empty() {
                state.pump = pump;
            }
        }

        Subscription {
            bus: self.downgrade(),
            id: Some(id),
        }
    }

    /// Opaque summary of the current versions of `keys` (all keys when
    /// `None`). Equal strings mean nothing relevant changed in between.
    pub fn snapshot(&self, keys: Option<&[String]>) -> String {
        let state = self.inner.lock();
        let mut out = format!(
            "g{}.v{}.r{}|",
            state.generation, state.visibility, state.refresh
        );
        match keys {
            Some(keys) => {
                let parts: Vec<String> = keys
                    .iter()
                    .map(|key| {
                        let version = state.versions.get(key).copied().unwrap_or(0);
                        format!("{key}={version}")
                    })
                    .collect();
                out.push_str(&parts.join(","));
            }
            None => out.push_str(&format!("*={}", state.any)),
        }
        out
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }

    /// True while inbound transport listeners are attached.
    pub fn is_listening(&self) -> bool {
        self.inner.lock().pump.is_some()
    }

    /// Feed a visibility transition directly (used when the host reports
    /// visibility without a transport).
    pub fn notify_visibility(&self, visibility: Visibility) {
        self.inner.handle(SignalEvent::Visibility(visibility));
    }

    /// Drop every subscriber and listener and start a new generation.
    /// Snapshots taken before the reset never equal later ones.
    pub fn reset(&self) {
        let pump = {
            let mut state = self.inner.lock();
            let generation = state.generation + 1;
            // Ids keep counting so handles from before the reset stay inert.
            let next_subscriber = state.next_subscriber;
            let pump = state.pump.take();
            *state = BusState {
                generation,
                next_subscriber,
                ..BusState::default()
            };
            pump
        };
        drop(pump);
        debug!(context = %self.inner.context_id, "signal bus reset");
    }
}

impl WeakSignalBus {
    pub fn upgrade(&self) -> Option<SignalBus> {
        self.inner.upgrade().map(|inner| SignalBus { inner })
    }
}

impl BusInner {
    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bump counters and notify subscribers outside the lock. `None` bumps
    /// every known key.
    fn bump(&self, key: Option<&str>) {
        let callbacks: Vec<SignalCallback> = {
            let mut state = self.lock();
            match key {
                Some(REFRESH_SIGNAL_KEY) => state.refresh += 1,
                Some(key) => *state.versions.entry(key.to_string()).or_insert(0) += 1,
                None => state.versions.values_mut().for_each(|v| *v += 1),
            }
            state.any += 1;
            state.subscribers.values().cloned().collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    fn bump_visibility(&self) {
        let callbacks: Vec<SignalCallback> = {
            let mut state = self.lock();
            state.visibility += 1;
            state.subscribers.values().cloned().collect()
        };
        for callback in callbacks {
            callback();
        }
    }

    fn handle(&self, event: SignalEvent) {
        match event {
            SignalEvent::Storage(change) if change.key == SIGNAL_SLOT_KEY => {
                let slot = change
                    .new_value
                    .as_deref()
                    .and_then(|raw| serde_json::from_str::<SlotValue>(raw).ok());
                trace!(context = %self.context_id, slot = ?slot, "signal slot changed");
                self.bump(slot.as_ref().map(|slot| slot.key.as_str()));
            }
            SignalEvent::Storage(change) => {
                trace!(context = %self.context_id, key = %change.key, "storage changed");
                self.bump(Some(&change.key));
            }
            SignalEvent::Message(message) => {
                if message.origin == self.context_id {
                    return;
                }
                trace!(context = %self.context_id, key = %message.key, "signal message");
                self.bump(Some(&message.key));
            }
            SignalEvent::Visibility(visibility) => {
                let became_visible = {
                    let mut state = self.lock();
                    let was_hidden = state.hidden;
                    state.hidden = visibility == Visibility::Hidden;
                    was_hidden && visibility == Visibility::Visible
                };
                if became_visible {
                    debug!(context = %self.context_id, "context visible again");
                    self.bump_visibility();
                }
            }
        }
    }

    /// Attach inbound listeners. Returns `None` (in-process only) when there
    /// are no transports or no async runtime to drive them.
    fn attach(&self, this: &Arc<BusInner>) -> Option<TransportPump> {
        let transports = self.transports.as_ref()?;
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                debug!(context = %self.context_id, "no runtime; signal bus stays in-process");
                return None;
            }
        };

        let (tx, mut rx) = mpsc::unbounded_channel::<SignalEvent>();
        let mut tasks = Vec::with_capacity(4);

        match transports.storage_events.watch() {
            Ok(source) => {
                tasks.push(runtime.spawn(forward(source, tx.clone(), SignalEvent::Storage)))
            }
            Err(err) => debug!(error = %err, "storage events unavailable"),
        }
        match transports.channel.listen() {
            Ok(source) => {
                tasks.push(runtime.spawn(forward(source, tx.clone(), SignalEvent::Message)))
            }
            Err(err) => debug!(error = %err, "broadcast channel unavailable"),
        }
        match transports.visibility.watch() {
            Ok(source) => {
                tasks.push(runtime.spawn(forward(source, tx.clone(), SignalEvent::Visibility)))
            }
            Err(err) => debug!(error = %err, "visibility events unavailable"),
        }
        drop(tx);

        let weak = Arc::downgrade(this);
        tasks.push(runtime.spawn(async move {
            while let Some(event) = rx.recv().await {
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                inner.handle(event);
            }
        }));

        debug!(context = %self.context_id, sources = tasks.len() - 1, "signal transports attached");
        Some(TransportPump { tasks })
    }
}

async fn forward<T>(
    mut source: mpsc::UnboundedReceiver<T>,
    sink: mpsc::UnboundedSender<SignalEvent>,
    wrap: fn(T) -> SignalEvent,
) {
    while let Some(item) = source.recv().await {
        if sink.send(wrap(item)).is_err() {
            break;
        }
    }
}

/// Handle returned by [`SignalBus::subscribe`]. Dropping it unsubscribes.
pub struct Subscription {
    bus: WeakSignalBus,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        let Some(bus) = self.bus.upgrade() else {
            return;
        };
        let pump = {
            let mut state = bus.inner.lock();
            state.subscribers.remove(&id);
            if state.subscribers.is_empty() {
                state.pump.take()
            } else {
                None
            }
        };
        if pump.is_some() {
            debug!(context = %bus.inner.context_id, "signal transports detached");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Sorted, deduplicated key set; identical sets give identical snapshots.
pub fn normalize_keys<I, K>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = K>,
    K: Into<String>,
{
    keys.into_iter()
        .map(Into::into)
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    struct StepClock(AtomicI64);

    impl ClockPort for StepClock {
        fn now_ms(&self) -> i64 {
            self.0.fetch_add(1, Ordering::SeqCst)
        }
    }

    fn bus() -> SignalBus {
        SignalBus::local("ctx-a", Arc::new(StepClock(AtomicI64::new(1))))
    }

    fn keys(items: &[&str]) -> Vec<String> {
        normalize_keys(items.iter().copied())
    }

    #[test]
    fn snapshot_is_stable_without_emits() {
        let bus = bus();
        let watched = keys(&["draft.about"]);

        assert_eq!(bus.snapshot(Some(&watched)), bus.snapshot(Some(&watched)));
        assert_eq!(bus.snapshot(None), bus.snapshot(None));
    }

    #[test]
    fn emit_changes_snapshot_of_that_key_only() {
        let bus = bus();
        let about = keys(&["draft.about"]);
        let contact = keys(&["draft.contact"]);
        let before_about = bus.snapshot(Some(&about));
        let before_contact = bus.snapshot(Some(&contact));
        let before_all = bus.snapshot(None);

        bus.emit("draft.about");

        assert_ne!(bus.snapshot(Some(&about)), before_about);
        assert_eq!(bus.snapshot(Some(&contact)), before_contact);
        assert_ne!(bus.snapshot(None), before_all);
    }

    #[test]
    fn emit_with_zero_subscribers_is_fine() {
        let bus = bus();
        bus.emit("draft.profile");
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn subscribers_are_notified_synchronously() {
        let bus = bus();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let _subscription = bus.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit("draft.home");
        bus.emit("draft.home");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dropping_subscription_stops_notifications() {
        let bus = bus();
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let subscription = bus.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        bus.emit("draft.home");
        subscription.unsubscribe();
        bus.emit("draft.home");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn refresh_changes_every_snapshot() {
        let bus = bus();
        let about = keys(&["draft.about"]);
        let before = bus.snapshot(Some(&about));

        bus.emit_refresh();

        assert_ne!(bus.snapshot(Some(&about)), before);
    }

    #[test]
    fn visibility_bumps_only_on_hidden_to_visible() {
        let bus = bus();
        let about = keys(&["draft.about"]);
        let initial = bus.snapshot(Some(&about));

        bus.notify_visibility(Visibility::Visible);
        assert_eq!(bus.snapshot(Some(&about)), initial);

        bus.notify_visibility(Visibility::Hidden);
        assert_eq!(bus.snapshot(Some(&about)), initial);

        bus.notify_visibility(Visibility::Visible);
        assert_ne!(bus.snapshot(Some(&about)), initial);
    }

    #[test]
    fn local_bus_never_listens() {
        let bus = bus();
        let _subscription = bus.subscribe(|| {});
        assert!(!bus.is_listening());
    }

    #[test]
    fn reset_drops_subscribers_and_changes_snapshots() {
        let bus = bus();
        let about = keys(&["draft.about"]);
        let _subscription = bus.subscribe(|| {});
        let before = bus.snapshot(Some(&about));

        bus.reset();

        assert_eq!(bus.subscriber_count(), 0);
        assert_ne!(bus.snapshot(Some(&about)), before);
    }

    #[test]
    fn handles_from_before_reset_leave_new_subscribers_alone() {
        let bus = bus();
        let stale = bus.subscribe(|| {});
        bus.reset();

        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let _fresh = bus.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        drop(stale);
        bus.emit("draft.about");

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn normalize_keys_sorts_and_dedupes() {
        assert_eq!(
            normalize_keys(["b", "a", "b"]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
