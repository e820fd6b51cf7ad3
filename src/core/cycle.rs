//! The cycle entity: one timed work interval.

use super::status::CycleStatus;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Record of a single work interval.
///
/// Everything except the two terminal timestamps is fixed at creation.
/// The terminal timestamps are filled in at most once, and only through
/// the store's transitions, which return a new `Cycle` rather than
/// mutating this one.
///
/// # Example
///
/// ```rust
/// use cycle_timer::core::{Cycle, CycleStatus};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let cycle = Cycle::new(Cycle::id_from_timestamp(now), "Write spec", 25, now);
///
/// assert_eq!(cycle.task(), "Write spec");
/// assert_eq!(cycle.total_seconds(), 1500);
/// assert_eq!(cycle.status(), CycleStatus::InProgress);
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    id: String,
    task: String,
    minutes_amount: u32,
    start_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interrupted_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finished_date: Option<DateTime<Utc>>,
}

impl Cycle {
    /// Create a new, in-progress cycle.
    pub fn new(
        id: impl Into<String>,
        task: impl Into<String>,
        minutes_amount: u32,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            task: task.into(),
            minutes_amount,
            start_date,
            interrupted_date: None,
            finished_date: None,
        }
    }

    /// Derive a cycle id from its creation instant (epoch milliseconds).
    pub fn id_from_timestamp(at: DateTime<Utc>) -> String {
        at.timestamp_millis().to_string()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn minutes_amount(&self) -> u32 {
        self.minutes_amount
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn interrupted_date(&self) -> Option<DateTime<Utc>> {
        self.interrupted_date
    }

    pub fn finished_date(&self) -> Option<DateTime<Utc>> {
        self.finished_date
    }

    /// Current lifecycle phase, derived from the terminal timestamps.
    ///
    /// A cycle carrying both timestamps can only come from corrupt
    /// storage; load validation rejects it, and here the earlier
    /// outcome (interruption) wins.
    pub fn status(&self) -> CycleStatus {
        if self.interrupted_date.is_some() {
            CycleStatus::Interrupted
        } else if self.finished_date.is_some() {
            CycleStatus::Finished
        } else {
            CycleStatus::InProgress
        }
    }

    /// Check if the cycle has reached a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status().is_final()
    }

    /// Target duration in whole seconds.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.minutes_amount) * 60
    }

    /// Instant at which the countdown reaches zero.
    pub fn ends_at(&self) -> DateTime<Utc> {
        self.start_date + Duration::minutes(i64::from(self.minutes_amount))
    }

    /// Return a copy stamped as interrupted at `at`.
    ///
    /// Terminal cycles are returned unchanged.
    pub(crate) fn interrupted(&self, at: DateTime<Utc>) -> Self {
        if self.is_terminal() {
            return self.clone();
        }
        Self {
            interrupted_date: Some(at),
            ..self.clone()
        }
    }

    /// Return a copy stamped as finished at `at`.
    ///
    /// Terminal cycles are returned unchanged.
    pub(crate) fn finished(&self, at: DateTime<Utc>) -> Self {
        if self.is_terminal() {
            return self.clone();
        }
        Self {
            finished_date: Some(at),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn new_cycle_is_in_progress() {
        let cycle = Cycle::new("1", "Read", 10, start());
        assert_eq!(cycle.status(), CycleStatus::InProgress);
        assert!(cycle.interrupted_date().is_none());
        assert!(cycle.finished_date().is_none());
    }

    #[test]
    fn id_is_epoch_millis() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(Cycle::id_from_timestamp(at), "1700000000123");
    }

    #[test]
    fn ends_at_adds_target_minutes() {
        let cycle = Cycle::new("1", "Read", 25, start());
        assert_eq!(
            cycle.ends_at(),
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 25, 0).unwrap()
        );
        assert_eq!(cycle.total_seconds(), 25 * 60);
    }

    #[test]
    fn interrupted_returns_new_value() {
        let cycle = Cycle::new("1", "Read", 10, start());
        let at = start() + Duration::minutes(3);
        let stopped = cycle.interrupted(at);

        assert_eq!(stopped.interrupted_date(), Some(at));
        assert_eq!(stopped.status(), CycleStatus::Interrupted);
        assert_eq!(cycle.status(), CycleStatus::InProgress);
    }

    #[test]
    fn terminal_cycle_is_never_restamped() {
        let cycle = Cycle::new("1", "Read", 10, start());
        let first = start() + Duration::minutes(3);
        let second = start() + Duration::minutes(5);

        let finished = cycle.finished(first);
        assert_eq!(finished.interrupted(second), finished);
        assert_eq!(finished.finished(second).finished_date(), Some(first));

        let interrupted = cycle.interrupted(first);
        assert_eq!(interrupted.finished(second), interrupted);
    }

    #[test]
    fn unset_dates_are_omitted_from_json() {
        let cycle = Cycle::new("1", "Read", 10, start());
        let json = serde_json::to_value(&cycle).unwrap();

        assert_eq!(json["minutesAmount"], 10);
        assert_eq!(json["startDate"], "2024-03-01T09:00:00Z");
        assert!(json.get("interruptedDate").is_none());
        assert!(json.get("finishedDate").is_none());
    }

    #[test]
    fn null_dates_are_accepted_on_read() {
        let json = r#"{
            "id": "1",
            "task": "Read",
            "minutesAmount": 10,
            "startDate": "2024-03-01T09:00:00.000Z",
            "interruptedDate": null,
            "finishedDate": null
        }"#;
        let cycle: Cycle = serde_json::from_str(json).unwrap();
        assert_eq!(cycle, Cycle::new("1", "Read", 10, start()));
    }
}
