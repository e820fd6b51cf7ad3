//! Persistence error types.

use std::fmt;
use std::io;
use thiserror::Error;

/// Errors raised by a `KeyValueStore` backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed
    #[error("I/O error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The backend cannot be reached at all
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// A single rule broken by a persisted state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateViolation {
    #[error("cycle id '{id}' appears more than once")]
    DuplicateId { id: String },

    #[error("cycle '{id}' has a zero-minute duration")]
    ZeroDuration { id: String },

    #[error("cycle '{id}' is both interrupted and finished")]
    ConflictingTerminalDates { id: String },

    #[error("active cycle '{id}' does not exist")]
    DanglingActiveCycle { id: String },

    #[error("active cycle '{id}' has already ended")]
    ActiveCycleEnded { id: String },
}

/// Errors that can occur while loading or saving cycle state
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Encoding state to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Stored text is not a valid encoding of the state
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Stored state decoded but broke one or more invariants
    #[error("Persisted state failed validation: {}", Violations(.0))]
    ValidationFailed(Vec<StateViolation>),

    /// The storage backend failed
    #[error(transparent)]
    Storage(#[from] StorageError),
}

struct Violations<'a>(&'a [StateViolation]);

impl fmt::Display for Violations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
