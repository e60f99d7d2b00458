use dax_processor::{ProcessorResult, ValueProcessor};
use dax_transaction::TransactionResult;
use dax_types::{ContainerType, Key};

use super::{client_removal, removed, wrong_variant};
use crate::block::BlockState;
use crate::entity::{Enderman, Entity, EntityKind};
use crate::keys;
use crate::types;

fn enderman<'a>(entity: &'a Entity, key: &'static str) -> ProcessorResult<&'a Enderman> {
    match entity.kind() {
        EntityKind::Enderman(enderman) => Ok(enderman),
        other => Err(wrong_variant(key, other)),
    }
}

fn enderman_mut<'a>(entity: &'a mut Entity, key: &'static str) -> ProcessorResult<&'a mut Enderman> {
    match entity.kind_mut() {
        EntityKind::Enderman(enderman) => Ok(enderman),
        other => Err(wrong_variant(key, other)),
    }
}

/// Block carried by an enderman. Absent when empty-handed; removable.
pub struct HeldBlockProcessor;

impl ValueProcessor for HeldBlockProcessor {
    type Container = Entity;
    type Value = BlockState;

    fn key(&self) -> Key<BlockState> {
        keys::HELD_BLOCK
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ENDERMAN
    }

    fn default_value(&self) -> BlockState {
        BlockState::air()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<BlockState>> {
        Ok(enderman(entity, self.key().id())?.held_block.clone())
    }

    fn set(&self, entity: &mut Entity, value: BlockState) -> ProcessorResult<bool> {
        if entity.is_client() {
            return Ok(false);
        }
        let enderman = enderman_mut(entity, self.key().id())?;
        if enderman.held_block.as_ref() == Some(&value) {
            return Ok(false);
        }
        enderman.held_block = Some(value);
        Ok(true)
    }

    fn remove(&self, entity: &mut Entity) -> ProcessorResult<TransactionResult> {
        if entity.is_client() {
            return Ok(client_removal());
        }
        let enderman = enderman_mut(entity, self.key().id())?;
        Ok(match enderman.held_block.take() {
            Some(old) => removed(self, old),
            None => TransactionResult::fail_no_data(),
        })
    }
}

pub struct ScreamingProcessor;

impl ValueProcessor for ScreamingProcessor {
    type Container = Entity;
    type Value = bool;

    fn key(&self) -> Key<bool> {
        keys::SCREAMING
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ENDERMAN
    }

    fn default_value(&self) -> bool {
        false
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<bool>> {
        Ok(Some(enderman(entity, self.key().id())?.screaming))
    }

    fn set(&self, entity: &mut Entity, value: bool) -> ProcessorResult<bool> {
        if entity.is_client() {
            return Ok(false);
        }
        let enderman = enderman_mut(entity, self.key().id())?;
        if enderman.screaming == value {
            return Ok(false);
        }
        enderman.screaming = value;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use dax_transaction::TransactionStatus;

    use super::*;
    use crate::processors::testing::dispatcher;

    fn grass() -> BlockState {
        BlockState::new("minecraft:grass").with("snowy", "false")
    }

    #[test]
    fn pick_up_and_drop_block() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        assert_eq!(dispatcher.get(&enderman, keys::HELD_BLOCK).unwrap(), None);

        assert!(dispatcher.offer(&mut enderman, keys::HELD_BLOCK, grass()).is_successful());
        assert_eq!(dispatcher.get(&enderman, keys::HELD_BLOCK).unwrap(), Some(grass()));

        let dropped = dispatcher.remove(&mut enderman, keys::HELD_BLOCK);
        assert!(dropped.is_successful());
        assert_eq!(dropped.replaced_value(keys::HELD_BLOCK), Some(grass()));
        assert_eq!(
            dispatcher.remove(&mut enderman, keys::HELD_BLOCK).status(),
            TransactionStatus::NoData
        );
    }

    #[test]
    fn held_block_default_is_air() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        dispatcher.offer(&mut enderman, keys::HELD_BLOCK, grass());
        let value = dispatcher.get_value(&enderman, keys::HELD_BLOCK).unwrap().unwrap();
        assert_eq!(value.default(), &BlockState::air());
    }

    #[test]
    fn held_block_is_canonicalised() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        dispatcher.offer(&mut enderman, keys::HELD_BLOCK, grass());
        let a = dispatcher.get_immutable_value(&enderman, keys::HELD_BLOCK).unwrap().unwrap();
        let b = dispatcher.get_immutable_value(&enderman, keys::HELD_BLOCK).unwrap().unwrap();
        assert!(dax_value::ImmutableValue::ptr_eq(&a, &b));
    }

    #[test]
    fn only_endermen_hold_blocks() {
        let dispatcher = dispatcher();
        let mut creeper = Entity::creeper();
        let result = dispatcher.offer(&mut creeper, keys::HELD_BLOCK, grass());
        assert_eq!(result.status(), TransactionStatus::NoData);
    }

    #[test]
    fn screaming_toggles() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        let result = dispatcher.offer(&mut enderman, keys::SCREAMING, true);
        assert_eq!(result.replaced_value(keys::SCREAMING), Some(false));
        assert_eq!(dispatcher.get(&enderman, keys::SCREAMING).unwrap(), Some(true));
    }
}
