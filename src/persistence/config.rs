//! Persistence configuration and its builder.

/// Default storage key. The version suffix changes whenever the stored
/// format does, so old data is ignored rather than misread.
pub const DEFAULT_STORAGE_KEY: &str = "@timer:cycles-state-1.0.0";

/// What to do when the stored state cannot be restored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CorruptStatePolicy {
    /// Start from the empty state and keep the error as a warning
    #[default]
    ResetAndReport,

    /// Refuse to start; the caller receives the error
    Fail,
}

/// Settings for the persistence gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceConfig {
    pub(crate) key: String,
    pub(crate) on_corrupt: CorruptStatePolicy,
    pub(crate) pretty: bool,
}

impl PersistenceConfig {
    pub fn builder() -> PersistenceConfigBuilder {
        PersistenceConfigBuilder::new()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn on_corrupt(&self) -> CorruptStatePolicy {
        self.on_corrupt
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        PersistenceConfigBuilder::new().build()
    }
}

/// Builder for creating persistence configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfigBuilder {
    key: String,
    on_corrupt: CorruptStatePolicy,
    pretty: bool,
}

impl PersistenceConfigBuilder {
    pub fn new() -> Self {
        Self {
            key: DEFAULT_STORAGE_KEY.to_string(),
            on_corrupt: CorruptStatePolicy::default(),
            pretty: false,
        }
    }

    /// Set the storage key (namespace) the state lives under
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Set corrupt-state handling
    pub fn on_corrupt(mut self, policy: CorruptStatePolicy) -> Self {
        self.on_corrupt = policy;
        self
    }

    /// Write indented JSON
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn build(self) -> PersistenceConfig {
        PersistenceConfig {
            key: self.key,
            on_corrupt: self.on_corrupt,
            pretty: self.pretty,
        }
    }
}

impl Default for PersistenceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
