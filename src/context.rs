//! The facade callers read from and dispatch into.
//!
//! `CyclesContext` is built once at startup with its storage and clock
//! and handed to whoever needs it. It is the only place that touches
//! both the store and the elapsed-time tracker.

use crate::clock::Clock;
use crate::core::{
    add_new_cycle, interrupt_current_cycle, mark_current_cycle_as_finished, Cycle, CycleAction,
    CycleSummary, CyclesState,
};
use crate::persistence::{KeyValueStore, PersistenceError, PersistenceGateway};
use crate::tracker::ElapsedTracker;
use tracing::{debug, warn};

/// Read access to cycle state plus the operations that change it.
///
/// # Example
///
/// ```rust
/// use cycle_timer::{CyclesContext, MemoryStore, PersistenceGateway, SystemClock};
///
/// let gateway = PersistenceGateway::with_defaults(MemoryStore::new());
/// let mut context = CyclesContext::load(gateway, SystemClock).unwrap();
///
/// context.create_new_cycle("Write spec", 25);
/// assert_eq!(context.active_cycle().map(|c| c.task()), Some("Write spec"));
///
/// context.interrupt_current_cycle();
/// assert!(context.active_cycle().is_none());
/// assert_eq!(context.cycles().len(), 1);
/// ```
pub struct CyclesContext<K: KeyValueStore, C: Clock> {
    state: CyclesState,
    tracker: ElapsedTracker,
    gateway: PersistenceGateway<K>,
    clock: C,
    load_warning: Option<PersistenceError>,
}

impl<K: KeyValueStore, C: Clock> CyclesContext<K, C> {
    /// Restore state through `gateway` and reconcile elapsed time with `clock`.
    ///
    /// Fails only when the gateway is configured to reject corrupt data.
    pub fn load(gateway: PersistenceGateway<K>, clock: C) -> Result<Self, PersistenceError> {
        let outcome = gateway.load()?;
        let tracker = ElapsedTracker::resume(outcome.state.active_cycle(), clock.now());
        Ok(Self {
            state: outcome.state,
            tracker,
            gateway,
            clock,
            load_warning: outcome.warning,
        })
    }

    pub fn state(&self) -> &CyclesState {
        &self.state
    }

    pub fn cycles(&self) -> &[Cycle] {
        self.state.cycles()
    }

    pub fn active_cycle(&self) -> Option<&Cycle> {
        self.state.active_cycle()
    }

    pub fn active_cycle_id(&self) -> Option<&str> {
        self.state.active_cycle_id()
    }

    pub fn amount_of_seconds_passed(&self) -> u64 {
        self.tracker.amount_of_seconds_passed()
    }

    /// Seconds left on the active cycle, if there is one.
    pub fn remaining_seconds(&self) -> Option<u64> {
        self.active_cycle()
            .map(|cycle| self.tracker.remaining_seconds(cycle))
    }

    pub fn summary(&self) -> CycleSummary {
        self.state.summary()
    }

    /// Why stored state was discarded at startup, if it was.
    pub fn load_warning(&self) -> Option<&PersistenceError> {
        self.load_warning.as_ref()
    }

    /// Start a new cycle now and make it active.
    ///
    /// A cycle that is still running gets interrupted at the same instant.
    /// A zero-minute duration is rejected and leaves everything unchanged.
    pub fn create_new_cycle(&mut self, task: impl Into<String>, minutes_amount: u32) {
        if minutes_amount == 0 {
            warn!("ignoring new cycle with a zero-minute duration");
            return;
        }

        let now = self.clock.now();
        let mut id_at = now;
        while self.state.contains_id(&Cycle::id_from_timestamp(id_at)) {
            id_at = id_at + chrono::Duration::milliseconds(1);
        }

        if let Some(previous) = self.state.active_cycle() {
            warn!(
                cycle_id = previous.id(),
                "starting a new cycle while another is active, interrupting it"
            );
        }

        let cycle = Cycle::new(Cycle::id_from_timestamp(id_at), task, minutes_amount, now);
        self.dispatch(add_new_cycle(cycle));
        self.tracker.reset();
    }

    pub fn interrupt_current_cycle(&mut self) {
        let action = interrupt_current_cycle(self.clock.now());
        self.dispatch(action);
    }

    pub fn mark_current_cycle_as_finished(&mut self) {
        let action = mark_current_cycle_as_finished(self.clock.now());
        self.dispatch(action);
    }

    /// Record the elapsed seconds reported by the tick driver.
    pub fn set_seconds_passed(&mut self, seconds: u64) {
        self.tracker.set_seconds_passed(seconds);
    }

    fn dispatch(&mut self, action: CycleAction) {
        let name = action.name();
        let next = self.state.apply(action);
        debug!(
            action = name,
            cycles = next.cycles().len(),
            active = next.active_cycle_id().unwrap_or("none"),
            "applied cycle action"
        );
        self.state = next;

        if let Err(err) = self.gateway.save(&self.state) {
            warn!(action = name, error = %err, "failed to persist cycle state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::core::CycleStatus;
    use crate::persistence::{MemoryStore, StorageError, DEFAULT_STORAGE_KEY};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use std::sync::Arc;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn context_at(
        store: MemoryStore,
    ) -> (CyclesContext<MemoryStore, Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(start()));
        let context =
            CyclesContext::load(PersistenceGateway::with_defaults(store), Arc::clone(&clock))
                .unwrap();
        (context, clock)
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn create_new_cycle_appends_and_activates() {
        let (mut context, _clock) = context_at(MemoryStore::new());
        context.set_seconds_passed(30);

        context.create_new_cycle("Write spec", 25);

        assert_eq!(context.cycles().len(), 1);
        let active = context.active_cycle().unwrap();
        assert_eq!(active.task(), "Write spec");
        assert_eq!(active.minutes_amount(), 25);
        assert_eq!(active.start_date(), start());
        assert_eq!(active.id(), Cycle::id_from_timestamp(start()));
        assert_eq!(context.active_cycle_id(), Some(active.id()));
        assert_eq!(context.amount_of_seconds_passed(), 0);
    }

    #[test]
    fn ids_stay_unique_within_one_millisecond() {
        let (mut context, _clock) = context_at(MemoryStore::new());

        context.create_new_cycle("a", 5);
        context.create_new_cycle("b", 5);

        let ids: Vec<&str> = context.cycles().iter().map(Cycle::id).collect();
        assert_ne!(ids[0], ids[1]);
        assert_eq!(context.cycles()[0].status(), CycleStatus::Interrupted);
    }

    #[test]
    fn interrupt_keeps_elapsed_seconds() {
        let (mut context, clock) = context_at(MemoryStore::new());
        context.create_new_cycle("Read", 25);

        clock.advance(Duration::seconds(42));
        context.set_seconds_passed(42);
        context.interrupt_current_cycle();

        assert!(context.active_cycle().is_none());
        assert_eq!(context.amount_of_seconds_passed(), 42);
        assert_eq!(
            context.cycles()[0].interrupted_date(),
            Some(start() + Duration::seconds(42))
        );
    }

    #[test]
    fn finish_stamps_current_time() {
        let (mut context, clock) = context_at(MemoryStore::new());
        context.create_new_cycle("Read", 1);

        clock.advance(Duration::seconds(60));
        context.set_seconds_passed(60);
        assert_eq!(context.remaining_seconds(), Some(0));
        context.mark_current_cycle_as_finished();

        assert_eq!(
            context.cycles()[0].finished_date(),
            Some(start() + Duration::seconds(60))
        );
        assert_eq!(context.remaining_seconds(), None);
        assert_eq!(context.amount_of_seconds_passed(), 60);
        assert_eq!(context.summary().finished, 1);
    }

    #[test]
    fn zero_minute_cycle_is_rejected() {
        let store = MemoryStore::new();
        let (mut context, clock) = context_at(store.clone());
        context.create_new_cycle("Read", 25);
        clock.advance(Duration::seconds(10));
        context.set_seconds_passed(10);
        let before = context.state().clone();
        let saved = store.get(DEFAULT_STORAGE_KEY).unwrap();

        context.create_new_cycle("Nothing", 0);

        assert_eq!(context.state(), &before);
        assert_eq!(context.amount_of_seconds_passed(), 10);
        assert_eq!(store.get(DEFAULT_STORAGE_KEY).unwrap(), saved);
    }

    #[test]
    fn every_action_is_persisted() {
        let store = MemoryStore::new();
        let (mut context, _clock) = context_at(store.clone());

        context.create_new_cycle("Read", 25);
        let saved = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"activeCycleId\":\""));

        context.interrupt_current_cycle();
        let saved = store.get(DEFAULT_STORAGE_KEY).unwrap().unwrap();
        assert!(saved.contains("\"activeCycleId\":null"));
        assert!(saved.contains("interruptedDate"));
    }

    #[test]
    fn save_failure_does_not_block_transitions() {
        let clock = ManualClock::new(start());
        let mut context =
            CyclesContext::load(PersistenceGateway::with_defaults(BrokenStore), &clock).unwrap();

        context.create_new_cycle("Read", 25);
        assert!(context.active_cycle().is_some());

        context.interrupt_current_cycle();
        assert!(context.active_cycle().is_none());
        assert_eq!(context.cycles().len(), 1);
    }

    #[test]
    fn corrupt_storage_surfaces_as_warning() {
        let store = MemoryStore::with_entry(DEFAULT_STORAGE_KEY, "garbage");
        let (context, _clock) = context_at(store);

        assert!(context.cycles().is_empty());
        assert!(context.load_warning().is_some());
    }
}
