use serde::{Deserialize, Serialize};

use dax_value::cache::DEFAULT_CAPACITY_PER_KEY;

/// Configuration for the [`crate::Dispatcher`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Canonical immutable values retained per key.
    pub value_cache_capacity: usize,
    /// Accept processor registrations after the dispatcher was built.
    pub allow_late_registration: bool,
    /// Consult the guard before mutations and notify it afterwards.
    pub guards_enabled: bool,
    /// Include offered values in debug logs.
    pub log_values: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            value_cache_capacity: DEFAULT_CAPACITY_PER_KEY,
            allow_late_registration: false,
            guards_enabled: true,
            log_values: false,
        }
    }
}

impl DispatcherConfig {
    /// Configuration for tests and tooling: no guard, late registration on.
    pub fn unguarded() -> Self {
        Self {
            allow_late_registration: true,
            guards_enabled: false,
            ..Default::default()
        }
    }
}
