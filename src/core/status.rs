//! Lifecycle phase of a cycle.
//!
//! A cycle's status is never stored; it is derived from which terminal
//! timestamp (if any) the cycle carries.

use serde::{Deserialize, Serialize};

/// Where a cycle sits in its lifecycle.
///
/// `InProgress` is the only non-final status. Both `Interrupted` and
/// `Finished` are terminal: once reached, the cycle never changes again.
///
/// # Example
///
/// ```rust
/// use cycle_timer::core::CycleStatus;
///
/// assert!(!CycleStatus::InProgress.is_final());
/// assert!(CycleStatus::Finished.is_final());
/// assert_eq!(CycleStatus::Interrupted.name(), "Interrupted");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CycleStatus {
    InProgress,
    Interrupted,
    Finished,
}

impl CycleStatus {
    /// Display name for logs and history listings.
    pub fn name(&self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Interrupted => "Interrupted",
            Self::Finished => "Finished",
        }
    }

    /// Check if this is a terminal status.
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Finished)
    }
}
