//! Value wrappers for DAX.
//!
//! A value binds a [`Key`](dax_types::Key) to its current value:
//!
//! - [`MutableValue`] — caller-owned snapshot that can be rebound in place.
//!   Rebinding never touches the container it was read from; persist it with
//!   the dispatcher's `offer`.
//! - [`ImmutableValue`] — shared value object. Equality and hashing use the
//!   key and the actual value only; the default is deliberately ignored.
//! - [`ImmutableValueCache`] — hands out canonical shared instances for
//!   common (key, default, actual) triples. Sharing is an allocation
//!   optimisation, never an identity guarantee.

pub mod cache;
pub mod value;

pub use cache::{CacheStats, ImmutableValueCache};
pub use value::{ErasedValue, ImmutableValue, MutableValue};
