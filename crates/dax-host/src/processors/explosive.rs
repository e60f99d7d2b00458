//! Processors for the fused-explosive capability.
//!
//! Priming and defusing are ordinary value changes: offering
//! `TICKS_REMAINING` to an unprimed explosive primes it, removing the value
//! defuses it. Both therefore pass through the mutation guard like any
//! other change.

use dax_processor::{ProcessorResult, ValueProcessor};
use dax_transaction::TransactionResult;
use dax_types::{ContainerType, Key};

use super::{client_removal, extension, extension_mut, removed};
use crate::entity::Entity;
use crate::keys;
use crate::state::{FuseState, CREEPER_FUSE};
use crate::types;

/// Fuse length. Must be positive.
pub struct FuseDurationProcessor;

impl ValueProcessor for FuseDurationProcessor {
    type Container = Entity;
    type Value = i32;

    fn key(&self) -> Key<i32> {
        keys::FUSE_DURATION
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::FUSED_EXPLOSIVE
    }

    fn default_value(&self) -> i32 {
        CREEPER_FUSE
    }

    fn supports(&self, entity: &Entity) -> bool {
        entity.extensions().contains::<FuseState>()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<i32>> {
        let fuse = extension::<FuseState>(entity, self.key().id())?;
        Ok(Some(fuse.duration))
    }

    fn set(&self, entity: &mut Entity, value: i32) -> ProcessorResult<bool> {
        if entity.is_client() || value <= 0 {
            return Ok(false);
        }
        let fuse = extension_mut::<FuseState>(entity, self.key().id())?;
        if fuse.duration == value {
            return Ok(false);
        }
        fuse.duration = value;
        Ok(true)
    }
}

/// Ticks until detonation; absent unless primed.
pub struct TicksRemainingProcessor;

impl ValueProcessor for TicksRemainingProcessor {
    type Container = Entity;
    type Value = i32;

    fn key(&self) -> Key<i32> {
        keys::TICKS_REMAINING
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::FUSED_EXPLOSIVE
    }

    fn default_value(&self) -> i32 {
        0
    }

    fn supports(&self, entity: &Entity) -> bool {
        entity.extensions().contains::<FuseState>()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<i32>> {
        let fuse = extension::<FuseState>(entity, self.key().id())?;
        Ok(fuse.remaining)
    }

    fn set(&self, entity: &mut Entity, value: i32) -> ProcessorResult<bool> {
        if entity.is_client() || value < 0 {
            return Ok(false);
        }
        let fuse = extension_mut::<FuseState>(entity, self.key().id())?;
        if fuse.remaining == Some(value) {
            return Ok(false);
        }
        fuse.remaining = Some(value);
        Ok(true)
    }

    fn remove(&self, entity: &mut Entity) -> ProcessorResult<TransactionResult> {
        if entity.is_client() {
            return Ok(client_removal());
        }
        let fuse = extension_mut::<FuseState>(entity, self.key().id())?;
        Ok(match fuse.remaining.take() {
            Some(old) => removed(self, old),
            None => TransactionResult::fail_no_data(),
        })
    }
}
