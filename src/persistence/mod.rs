//! Loading and saving cycle state.
//!
//! The gateway restores the store's state at startup and writes it back
//! after every transition. The storage backend is injected through the
//! `KeyValueStore` trait, and the key it writes under comes from
//! `PersistenceConfig`, so nothing here depends on a global location.
//!
//! The stored value is the JSON encoding of `CyclesState`:
//!
//! ```json
//! {"cycles":[{"id":"1709283600000","task":"Write spec","minutesAmount":25,
//!   "startDate":"2024-03-01T09:00:00Z"}],"activeCycleId":"1709283600000"}
//! ```

use crate::core::CyclesState;
use tracing::{debug, info, warn};

pub mod config;
pub mod error;
pub mod storage;
pub mod validation;

pub use config::{CorruptStatePolicy, PersistenceConfig, PersistenceConfigBuilder, DEFAULT_STORAGE_KEY};
pub use error::{PersistenceError, StateViolation, StorageError};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use validation::validate_state;

/// Result of restoring state at startup.
#[derive(Debug)]
pub struct LoadOutcome {
    /// The state to start from
    pub state: CyclesState,

    /// Why stored data was discarded, if it was
    pub warning: Option<PersistenceError>,
}

/// Reads and writes `CyclesState` through a key-value store.
#[derive(Debug, Clone)]
pub struct PersistenceGateway<K: KeyValueStore> {
    store: K,
    config: PersistenceConfig,
}

impl<K: KeyValueStore> PersistenceGateway<K> {
    pub fn new(store: K, config: PersistenceConfig) -> Self {
        Self { store, config }
    }

    /// Gateway using the default configuration.
    pub fn with_defaults(store: K) -> Self {
        Self::new(store, PersistenceConfig::default())
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    /// Restore the initial state.
    ///
    /// Nothing stored yields the empty state. Stored data that cannot be
    /// read, decoded or validated is handled per `CorruptStatePolicy`:
    /// either the empty state plus a warning, or an error.
    pub fn load(&self) -> Result<LoadOutcome, PersistenceError> {
        let key = self.config.key();
        match self.read() {
            Ok(Some(state)) => {
                info!(
                    key,
                    cycles = state.cycles().len(),
                    active = state.active_cycle_id().unwrap_or("none"),
                    "restored cycle state"
                );
                Ok(LoadOutcome {
                    state,
                    warning: None,
                })
            }
            Ok(None) => {
                debug!(key, "no stored cycle state, starting empty");
                Ok(LoadOutcome {
                    state: CyclesState::new(),
                    warning: None,
                })
            }
            Err(err) => match self.config.on_corrupt() {
                CorruptStatePolicy::ResetAndReport => {
                    warn!(key, error = %err, "discarding unreadable cycle state");
                    Ok(LoadOutcome {
                        state: CyclesState::new(),
                        warning: Some(err),
                    })
                }
                CorruptStatePolicy::Fail => Err(err),
            },
        }
    }

    /// Overwrite the stored state with `state`.
    pub fn save(&self, state: &CyclesState) -> Result<(), PersistenceError> {
        let text = encode(state, self.config.pretty())?;
        self.store.set(self.config.key(), &text)?;
        debug!(key = self.config.key(), bytes = text.len(), "saved cycle state");
        Ok(())
    }

    fn read(&self) -> Result<Option<CyclesState>, PersistenceError> {
        self.store
            .get(self.config.key())?
            .map(|text| decode(&text))
            .transpose()
    }
}

/// Encode state as JSON text.
pub fn encode(state: &CyclesState, pretty: bool) -> Result<String, PersistenceError> {
    let result = if pretty {
        serde_json::to_string_pretty(state)
    } else {
        serde_json::to_string(state)
    };
    result.map_err(|e| PersistenceError::SerializationFailed(e.to_string()))
}

/// Decode and validate state from JSON text.
pub fn decode(text: &str) -> Result<CyclesState, PersistenceError> {
    let state: CyclesState = serde_json::from_str(text)
        .map_err(|e| PersistenceError::DeserializationFailed(e.to_string()))?;

    let violations = validation::violations(&state);
    if violations.is_empty() {
        Ok(state)
    } else {
        Err(PersistenceError::ValidationFailed(violations))
    }
}
