//! Elapsed-time bookkeeping for the active cycle.
//!
//! The tracker lives beside the store rather than inside it: the store
//! changes on discrete events, while elapsed seconds move once per tick.
//! The tracker owns no timer of its own; an external driver calls
//! `set_seconds_passed` on every tick.

use crate::core::Cycle;
use chrono::{DateTime, Utc};

/// Seconds elapsed since the active cycle started.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ElapsedTracker {
    amount_of_seconds_passed: u64,
}

impl ElapsedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile against wall-clock time at startup.
    ///
    /// With an active cycle this is the number of whole seconds between its
    /// start and `now`, so time spent while the application was closed is
    /// counted. Without one it is zero.
    pub fn resume(active: Option<&Cycle>, now: DateTime<Utc>) -> Self {
        let amount_of_seconds_passed = active
            .map(|cycle| seconds_between(cycle.start_date(), now))
            .unwrap_or(0);
        Self {
            amount_of_seconds_passed,
        }
    }

    pub fn amount_of_seconds_passed(&self) -> u64 {
        self.amount_of_seconds_passed
    }

    pub fn set_seconds_passed(&mut self, seconds: u64) {
        self.amount_of_seconds_passed = seconds;
    }

    pub fn reset(&mut self) {
        self.amount_of_seconds_passed = 0;
    }

    /// Seconds left on `cycle`'s countdown, saturating at zero.
    pub fn remaining_seconds(&self, cycle: &Cycle) -> u64 {
        cycle
            .total_seconds()
            .saturating_sub(self.amount_of_seconds_passed)
    }

    /// Check if `cycle`'s countdown has run out.
    pub fn is_complete(&self, cycle: &Cycle) -> bool {
        self.remaining_seconds(cycle) == 0
    }
}

/// Whole seconds from `start` to `now`; zero if `start` lies in the future.
pub fn seconds_between(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from(now.signed_duration_since(start).num_seconds()).unwrap_or(0)
}
