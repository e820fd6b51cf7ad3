//! Core cycle types and logic.
//!
//! This module contains the pure functional core of the timer:
//! - The `Cycle` entity and its derived `CycleStatus`
//! - `CycleAction` transition requests and their constructors
//! - `CyclesState`, whose `apply` is the reducer
//!
//! All logic in this module is pure (no side effects, no clock reads).

mod action;
mod cycle;
mod status;
mod store;

pub use action::{
    add_new_cycle, interrupt_current_cycle, mark_current_cycle_as_finished, CycleAction,
};
pub use cycle::Cycle;
pub use status::CycleStatus;
pub use store::{CycleSummary, CyclesState};
