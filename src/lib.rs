//! Cycle Timer: the state core of a task countdown timer
//!
//! A user names a task, picks a duration, and a countdown runs. This crate
//! keeps the record of those work cycles: which one is running, which ones
//! were interrupted or finished, and how many seconds the running one has
//! been going. Rendering and the tick loop live elsewhere and only call in.
//!
//! # Layout
//!
//! - [`core`]: the pure part. `Cycle`, `CycleAction`, and `CyclesState`,
//!   whose `apply` is the reducer
//! - [`tracker`]: elapsed seconds for the active cycle
//! - [`persistence`]: JSON load/save through an injected key-value store
//! - [`clock`]: where "now" comes from
//! - [`context`]: the facade tying them together
//!
//! # Example
//!
//! ```rust
//! use cycle_timer::{CyclesContext, ManualClock, MemoryStore, PersistenceGateway};
//! use chrono::{Duration, TimeZone, Utc};
//! use std::sync::Arc;
//!
//! let store = MemoryStore::new();
//! let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()));
//!
//! let mut context =
//!     CyclesContext::load(PersistenceGateway::with_defaults(store.clone()), Arc::clone(&clock))
//!         .unwrap();
//! context.create_new_cycle("Write spec", 25);
//!
//! // Forty-five seconds later the application restarts.
//! clock.advance(Duration::seconds(45));
//! let restored =
//!     CyclesContext::load(PersistenceGateway::with_defaults(store), Arc::clone(&clock)).unwrap();
//!
//! assert_eq!(restored.active_cycle().map(|c| c.task()), Some("Write spec"));
//! assert_eq!(restored.amount_of_seconds_passed(), 45);
//! ```

pub mod clock;
pub mod context;
pub mod core;
pub mod persistence;
pub mod tracker;

// Re-export commonly used types
pub use clock::{Clock, ManualClock, SystemClock};
pub use context::CyclesContext;
pub use crate::core::{Cycle, CycleAction, CycleStatus, CycleSummary, CyclesState};
pub use persistence::{
    CorruptStatePolicy, FileStore, KeyValueStore, MemoryStore, PersistenceConfig,
    PersistenceError, PersistenceGateway,
};
pub use tracker::ElapsedTracker;
