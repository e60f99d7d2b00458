//! High-level SDK for DAX.
//!
//! Loads configuration, installs logging, and assembles a [`Dispatcher`]
//! with the built-in host processors. This is the main entry point for
//! applications embedding the value layer.

pub mod config;
pub mod error;
pub mod layer;
pub mod logging;

pub use config::DaxConfig;
pub use error::{ConfigError, SdkError, SdkResult};
pub use layer::{DataLayer, DataLayerBuilder};
pub use logging::init_logging;

// Re-export key types
pub use dax_guard::{GuardChain, GuardDecision, MutationGuard, ProposedMutation};
pub use dax_host::{keys, Entity, EntityKind, Side};
pub use dax_registry::{DataError, Dispatcher, DispatcherConfig};
pub use dax_transaction::{TransactionResult, TransactionStatus};
pub use dax_types::{Cause, DataValue, Key};
pub use dax_value::{ImmutableValue, MutableValue};
