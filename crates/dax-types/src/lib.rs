//! Foundation types for DAX, the capability-keyed value access layer.
//!
//! This crate provides the identity and value types shared by every other
//! DAX crate. Nothing here knows about processors or dispatch.
//!
//! # Key Types
//!
//! - [`KeyDef`] — Static definition of a logical value (stable id, name, kind)
//! - [`Key`] — Typed, `Copy` handle to a [`KeyDef`]; equality is identity
//! - [`KeyRegistry`] — Lookup of key definitions by stable string id
//! - [`ContainerType`] — Node in the container type hierarchy used for specificity
//! - [`DataHolder`] — Trait implemented by every container
//! - [`DataValue`] / [`DataType`] — Erased value model and its typed bridge
//! - [`Cause`] — Explicit description of why a mutation happens

pub mod cause;
pub mod container;
pub mod data;
pub mod error;
pub mod key;

pub use cause::{context_keys, Cause, NamedCause};
pub use container::{ContainerType, DataHolder};
pub use data::{DataType, DataValue, ValueKind};
pub use error::TypeError;
pub use key::{Key, KeyDef, KeyRegistry};
