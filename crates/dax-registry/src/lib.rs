//! Processor registry and dispatcher for DAX.
//!
//! The [`ProcessorRegistry`] is built at startup: every key is registered
//! together with the processors that implement it, each declared for a
//! container type. The [`Dispatcher`] owns the sealed registry and is the
//! single entry point for reads, offers, and removals.
//!
//! # Selection
//!
//! For a (container, key) pair the candidates are the key's processors whose
//! declared container type is assignable from the container's runtime type.
//! Among those, the maximally specific ones are kept (no other candidate is
//! declared for a proper subtype), and the earliest registered of them wins.
//! Registration order only breaks ties; it never overrides specificity.
//!
//! # Offer pipeline
//!
//! select, `supports`, guard `can_apply`, capture prior value, `set`, build
//! the result, guard `notify` on success. See [`Dispatcher::offer_with_cause`].

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registry;

pub use config::DispatcherConfig;
pub use dispatcher::{Dispatcher, UNATTRIBUTED};
pub use error::{DataError, DataResult, RegistryError, RegistryResult};
pub use registry::ProcessorRegistry;
