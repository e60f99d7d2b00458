//! Sample host model for DAX.
//!
//! A small entity model that exercises the value layer the way a game
//! server would: entities are one tagged-union type whose variants report
//! distinct container types, capabilities such as "fused explosive" or
//! "skinnable" are container types shared by several variants, and per
//! entity extension state lives in a type-keyed side-table instead of being
//! injected into the host types.
//!
//! # Modules
//!
//! - [`entity`] -- [`Entity`], its variants, and replica side
//! - [`types`] -- container type hierarchy
//! - [`keys`] -- built-in keys
//! - [`extension`] / [`state`] -- side-table and the state kept in it
//! - [`block`] / [`projectile`] -- composite value types
//! - [`processors`] -- built-in processors and [`register_builtins`]

pub mod block;
pub mod entity;
pub mod extension;
pub mod keys;
pub mod processors;
pub mod projectile;
pub mod state;
pub mod types;

pub use block::BlockState;
pub use entity::{Arrow, Creeper, Enderman, Entity, EntityId, EntityKind, Human, Player, PrimedTnt, Side};
pub use extension::ExtensionMap;
pub use processors::register_builtins;
pub use projectile::ProjectileSource;
