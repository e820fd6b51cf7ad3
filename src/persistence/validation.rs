//! Invariant checks for state restored from storage.
//!
//! Uses Stillwater's `Validation` so that every broken rule is reported
//! in one pass instead of stopping at the first.

use crate::core::CyclesState;
use crate::persistence::error::StateViolation;
use std::collections::HashSet;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<StateViolation>>;

/// Check a decoded state against the store's invariants.
pub fn validate_state(state: &CyclesState) -> Validation<(), NonEmptyVec<StateViolation>> {
    let mut checks: Vec<Check> = Vec::new();
    let mut seen = HashSet::new();

    for cycle in state.cycles() {
        if !seen.insert(cycle.id()) {
            checks.push(Validation::fail(StateViolation::DuplicateId {
                id: cycle.id().to_string(),
            }));
        }
        if cycle.minutes_amount() == 0 {
            checks.push(Validation::fail(StateViolation::ZeroDuration {
                id: cycle.id().to_string(),
            }));
        }
        if cycle.interrupted_date().is_some() && cycle.finished_date().is_some() {
            checks.push(Validation::fail(StateViolation::ConflictingTerminalDates {
                id: cycle.id().to_string(),
            }));
        }
    }

    if let Some(id) = state.active_cycle_id() {
        let check: Check = match state.find(id) {
            None => Validation::fail(StateViolation::DanglingActiveCycle { id: id.to_string() }),
            Some(cycle) if cycle.is_terminal() => {
                Validation::fail(StateViolation::ActiveCycleEnded { id: id.to_string() })
            }
            Some(_) => Validation::success(()),
        };
        checks.push(check);
    }

    Validation::all_vec(checks).map(|_| ())
}

/// Collect the violations of `state`, empty when it is valid.
pub fn violations(state: &CyclesState) -> Vec<StateViolation> {
    match validate_state(state) {
        Validation::Success(_) => Vec::new(),
        Validation::Failure(errors) => errors.iter().cloned().collect(),
    }
}
