//! Transition requests consumed by the cycle store.

use super::cycle::Cycle;
use chrono::{DateTime, Utc};

/// A request to move the store from one state to the next.
///
/// Terminal transitions carry the instant they happened at, so that
/// applying an action is deterministic.
#[derive(Clone, PartialEq, Debug)]
pub enum CycleAction {
    /// Append a new cycle and make it the active one.
    AddNewCycle(Cycle),

    /// Stop the active cycle before its countdown reached zero.
    InterruptCurrentCycle { at: DateTime<Utc> },

    /// Close the active cycle because its countdown reached zero.
    MarkCurrentCycleAsFinished { at: DateTime<Utc> },
}

impl CycleAction {
    /// Name of the action for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddNewCycle(_) => "AddNewCycle",
            Self::InterruptCurrentCycle { .. } => "InterruptCurrentCycle",
            Self::MarkCurrentCycleAsFinished { .. } => "MarkCurrentCycleAsFinished",
        }
    }
}

pub fn add_new_cycle(cycle: Cycle) -> CycleAction {
    CycleAction::AddNewCycle(cycle)
}

pub fn interrupt_current_cycle(at: DateTime<Utc>) -> CycleAction {
    CycleAction::InterruptCurrentCycle { at }
}

pub fn mark_current_cycle_as_finished(at: DateTime<Utc>) -> CycleAction {
    CycleAction::MarkCurrentCycleAsFinished { at }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factories_build_tagged_actions() {
        let now = Utc::now();
        let cycle = Cycle::new("1", "Read", 5, now);

        assert_eq!(add_new_cycle(cycle.clone()), CycleAction::AddNewCycle(cycle));
        assert_eq!(
            interrupt_current_cycle(now),
            CycleAction::InterruptCurrentCycle { at: now }
        );
        assert_eq!(
            mark_current_cycle_as_finished(now),
            CycleAction::MarkCurrentCycleAsFinished { at: now }
        );
    }

    #[test]
    fn action_names_match_variants() {
        let now = Utc::now();
        assert_eq!(
            add_new_cycle(Cycle::new("1", "Read", 5, now)).name(),
            "AddNewCycle"
        );
        assert_eq!(interrupt_current_cycle(now).name(), "InterruptCurrentCycle");
        assert_eq!(
            mark_current_cycle_as_finished(now).name(),
            "MarkCurrentCycleAsFinished"
        );
    }
}
