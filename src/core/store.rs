//! The cycle store: state plus its pure transition function.
//!
//! `CyclesState` is immutable from the outside. `apply` never touches
//! `self`; it returns the next state, leaving the previous one intact.

use super::action::CycleAction;
use super::cycle::Cycle;
use super::status::CycleStatus;
use serde::{Deserialize, Serialize};

/// All recorded cycles plus a pointer to the one in progress.
///
/// # Example
///
/// ```rust
/// use cycle_timer::core::{add_new_cycle, interrupt_current_cycle, Cycle, CyclesState};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let state = CyclesState::new();
///
/// let running = state.apply(add_new_cycle(Cycle::new("1", "Read", 25, now)));
/// assert_eq!(running.active_cycle_id(), Some("1"));
///
/// let stopped = running.apply(interrupt_current_cycle(now));
/// assert_eq!(stopped.active_cycle_id(), None);
/// assert_eq!(running.active_cycle_id(), Some("1")); // Original unchanged
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CyclesState {
    #[serde(default)]
    cycles: Vec<Cycle>,
    #[serde(default)]
    active_cycle_id: Option<String>,
}

/// Counts over the recorded cycles.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub total: usize,
    pub in_progress: usize,
    pub interrupted: usize,
    pub finished: usize,
    /// Target minutes of every finished cycle, summed.
    pub focused_minutes: u64,
}

impl CyclesState {
    /// Create the empty state: no cycles, nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from parts without checking invariants.
    ///
    /// Used when restoring from storage; the persistence layer validates
    /// the result before handing it out.
    pub fn from_parts(cycles: Vec<Cycle>, active_cycle_id: Option<String>) -> Self {
        Self {
            cycles,
            active_cycle_id,
        }
    }

    /// All cycles, oldest first.
    pub fn cycles(&self) -> &[Cycle] {
        &self.cycles
    }

    pub fn active_cycle_id(&self) -> Option<&str> {
        self.active_cycle_id.as_deref()
    }

    /// The first cycle whose id matches the active pointer.
    pub fn active_cycle(&self) -> Option<&Cycle> {
        let id = self.active_cycle_id.as_deref()?;
        self.find(id)
    }

    pub fn find(&self, id: &str) -> Option<&Cycle> {
        self.cycles.iter().find(|cycle| cycle.id() == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Apply a transition, returning the next state.
    ///
    /// Total: every action on every state yields a state. Interrupting or
    /// finishing with nothing active is a no-op. Adding a cycle while
    /// another is still running interrupts the old one at the new
    /// cycle's start time.
    pub fn apply(&self, action: CycleAction) -> Self {
        match action {
            CycleAction::AddNewCycle(cycle) => {
                let closed = match self.active_cycle() {
                    Some(_) => self.close_active(|c| c.interrupted(cycle.start_date())),
                    None => self.clone(),
                };
                let mut cycles = closed.cycles;
                let active_cycle_id = Some(cycle.id().to_string());
                cycles.push(cycle);
                Self {
                    cycles,
                    active_cycle_id,
                }
            }
            CycleAction::InterruptCurrentCycle { at } => {
                self.close_active(|cycle| cycle.interrupted(at))
            }
            CycleAction::MarkCurrentCycleAsFinished { at } => {
                self.close_active(|cycle| cycle.finished(at))
            }
        }
    }

    /// Tally cycles by status.
    pub fn summary(&self) -> CycleSummary {
        self.cycles
            .iter()
            .fold(CycleSummary::default(), |mut summary, cycle| {
                summary.total += 1;
                match cycle.status() {
                    CycleStatus::InProgress => summary.in_progress += 1,
                    CycleStatus::Interrupted => summary.interrupted += 1,
                    CycleStatus::Finished => {
                        summary.finished += 1;
                        summary.focused_minutes += u64::from(cycle.minutes_amount());
                    }
                }
                summary
            })
    }

    fn close_active(&self, close: impl Fn(&Cycle) -> Cycle) -> Self {
        let Some(active_id) = self.active_cycle_id.as_deref() else {
            return self.clone();
        };

        if !self.contains_id(active_id) {
            return self.clone();
        }

        let cycles = self
            .cycles
            .iter()
            .map(|cycle| {
                if cycle.id() == active_id {
                    close(cycle)
                } else {
                    cycle.clone()
                }
            })
            .collect();

        Self {
            cycles,
            active_cycle_id: None,
        }
    }
}
