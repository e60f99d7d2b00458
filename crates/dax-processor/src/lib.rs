//! Processor traits for DAX.
//!
//! A processor is the strategy that knows how to read, write, and remove
//! one key on one container type. It is the unit of extensibility: adding
//! support for a value on a new kind of object means writing a processor.
//!
//! # Traits
//!
//! - [`ValueProcessor`] -- typed authoring surface. Implementors name their
//!   concrete container type and value type and never see erased values.
//! - [`DataProcessor`] -- object-safe, erased view stored by the registry.
//!   Every `ValueProcessor` is a `DataProcessor` through a blanket impl
//!   that performs the container downcast and value conversion.
//!
//! # Contract
//!
//! 1. `get` returns `Ok(None)` when the value does not apply to the
//!    container right now; a present `false`/`0` is `Ok(Some(..))`.
//! 2. `set` returns `Ok(true)` only when the container's observable state
//!    changed. It returns `Ok(false)` and leaves the container untouched
//!    when a precondition fails.
//! 3. `remove` on a value without an unset concept reports `NoData`.
//! 4. `Err` means the processor itself is broken. The dispatcher never
//!    turns it into an absent value.

pub mod error;
pub mod processor;

pub use error::{ProcessorError, ProcessorResult};
pub use processor::{DataProcessor, ValueProcessor};
