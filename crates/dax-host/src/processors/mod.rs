//! Built-in processors.
//!
//! Every processor here works on [`Entity`] and declares the most general
//! container type it can serve. Mutations on client replicas are refused
//! (`set` returns `false`), since those mirror server state.

pub mod arrow;
pub mod enderman;
pub mod entity;
pub mod explosive;
pub mod player;
pub mod skin;

use std::any::Any;

use tracing::debug;

use dax_processor::{ProcessorError, ProcessorResult, ValueProcessor};
use dax_registry::{ProcessorRegistry, RegistryResult};
use dax_transaction::{TransactionResult, TransactionStatus};

use crate::entity::{Entity, EntityKind};

pub use arrow::{KnockbackStrengthProcessor, ShooterProcessor};
pub use enderman::{HeldBlockProcessor, ScreamingProcessor};
pub use entity::{DisplayNameProcessor, InvisibilityTargetProcessor, VanishProcessor};
pub use explosive::{FuseDurationProcessor, TicksRemainingProcessor};
pub use player::{HealthScaleProcessor, PlayerDisplayNameProcessor};
pub use skin::SkinProcessor;

/// Register every built-in processor.
///
/// Key registration order (and so bulk enumeration order) follows the order
/// below.
pub fn register_builtins(registry: &mut ProcessorRegistry) -> RegistryResult<()> {
    registry.register(InvisibilityTargetProcessor)?;
    registry.register(VanishProcessor)?;
    registry.register(DisplayNameProcessor)?;
    registry.register(PlayerDisplayNameProcessor)?;
    registry.register(FuseDurationProcessor)?;
    registry.register(TicksRemainingProcessor)?;
    registry.register(HeldBlockProcessor)?;
    registry.register(ScreamingProcessor)?;
    registry.register(ShooterProcessor)?;
    registry.register(KnockbackStrengthProcessor)?;
    registry.register(HealthScaleProcessor)?;
    registry.register(SkinProcessor)?;
    debug!(processors = registry.processor_count(), "registered built-in processors");
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

pub(crate) fn extension<'a, T: Any + Send + Sync>(
    entity: &'a Entity,
    key: &'static str,
) -> ProcessorResult<&'a T> {
    entity
        .extensions()
        .get::<T>()
        .ok_or_else(|| missing_extension::<T>(key))
}

pub(crate) fn extension_mut<'a, T: Any + Send + Sync>(
    entity: &'a mut Entity,
    key: &'static str,
) -> ProcessorResult<&'a mut T> {
    entity
        .extensions_mut()
        .get_mut::<T>()
        .ok_or_else(|| missing_extension::<T>(key))
}

fn missing_extension<T>(key: &'static str) -> ProcessorError {
    ProcessorError::internal(
        key,
        format!("entity has no {} state", std::any::type_name::<T>()),
    )
}

/// Fault for an entity whose variant does not match its container type.
pub(crate) fn wrong_variant(key: &'static str, found: &EntityKind) -> ProcessorError {
    ProcessorError::internal(
        key,
        format!("unexpected {} variant", found.container_type()),
    )
}

/// Successful removal of `old`.
pub(crate) fn removed<P: ValueProcessor>(processor: &P, old: P::Value) -> TransactionResult {
    TransactionResult::builder()
        .replace(&processor.construct_immutable_value(old))
        .result(TransactionStatus::Success)
        .build()
}

/// Removal refused on a client replica.
pub(crate) fn client_removal() -> TransactionResult {
    TransactionResult::builder()
        .result(TransactionStatus::Failure)
        .build()
}


#[cfg(test)]
mod tests {
    use dax_types::KeyDef;

    use super::*;
    use crate::keys;

    #[test]
    fn builtins_cover_every_key() {
        let mut registry = ProcessorRegistry::new();
        register_builtins(&mut registry).unwrap();
        let registered: Vec<_> = registry.keys().iter().collect();
        let declared = keys::all();
        assert_eq!(registered.len(), declared.len());
        for (a, b) in registered.iter().zip(&declared) {
            assert!(KeyDef::same(a, b), "{} != {}", a.id(), b.id());
        }
        assert_eq!(registry.processor_count(), declared.len() + 1);
    }

    #[test]
    fn registering_twice_adds_processors_not_keys() {
        let mut registry = ProcessorRegistry::new();
        register_builtins(&mut registry).unwrap();
        register_builtins(&mut registry).unwrap();
        assert_eq!(registry.keys().len(), keys::all().len());
    }
}
