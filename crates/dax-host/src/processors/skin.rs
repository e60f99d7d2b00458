use dax_processor::{ProcessorResult, ValueProcessor};
use dax_transaction::TransactionResult;
use dax_types::{ContainerType, Key};

use super::{client_removal, extension, extension_mut, removed};
use crate::entity::Entity;
use crate::keys;
use crate::state::SkinState;
use crate::types;

/// Skin texture of any skinnable entity. Removing it restores the default
/// skin.
pub struct SkinProcessor;

impl ValueProcessor for SkinProcessor {
    type Container = Entity;
    type Value = String;

    fn key(&self) -> Key<String> {
        keys::SKIN
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::SKINNABLE
    }

    fn default_value(&self) -> String {
        String::new()
    }

    fn supports(&self, entity: &Entity) -> bool {
        entity.extensions().contains::<SkinState>()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<String>> {
        Ok(extension::<SkinState>(entity, self.key().id())?.skin.clone())
    }

    fn set(&self, entity: &mut Entity, value: String) -> ProcessorResult<bool> {
        if entity.is_client() || value.is_empty() {
            return Ok(false);
        }
        let state = extension_mut::<SkinState>(entity, self.key().id())?;
        if state.skin.as_ref() == Some(&value) {
            return Ok(false);
        }
        state.skin = Some(value);
        Ok(true)
    }

    fn remove(&self, entity: &mut Entity) -> ProcessorResult<TransactionResult> {
        if entity.is_client() {
            return Ok(client_removal());
        }
        let state = extension_mut::<SkinState>(entity, self.key().id())?;
        Ok(match state.skin.take() {
            Some(old) => removed(self, old),
            None => TransactionResult::fail_no_data(),
        })
    }
}

#[cfg(test)]
mod tests {
    use dax_transaction::TransactionStatus;

    use super::*;
    use crate::entity::Side;
    use crate::processors::testing::dispatcher;

    #[test]
    fn players_and_humans_share_skins() {
        let dispatcher = dispatcher();
        for mut entity in [Entity::player("Alex"), Entity::human()] {
            assert!(dispatcher.supports(&entity, keys::SKIN));
            let result = dispatcher.offer(&mut entity, keys::SKIN, "textures/steve".to_string());
            assert!(result.is_successful());
            assert_eq!(
                dispatcher.get(&entity, keys::SKIN).unwrap(),
                Some("textures/steve".to_string())
            );
        }
        assert!(!dispatcher.supports(&Entity::creeper(), keys::SKIN));
    }

    #[test]
    fn empty_skin_rejected() {
        let dispatcher = dispatcher();
        let mut npc = Entity::human();
        let result = dispatcher.offer(&mut npc, keys::SKIN, String::new());
        assert_eq!(result.status(), TransactionStatus::Failure);
    }

    #[test]
    fn skin_removal() {
        let dispatcher = dispatcher();
        let mut npc = Entity::human();
        dispatcher.offer(&mut npc, keys::SKIN, "textures/alex".to_string());

        let removed = dispatcher.remove(&mut npc, keys::SKIN);
        assert_eq!(removed.replaced_value(keys::SKIN), Some("textures/alex".to_string()));
        assert_eq!(dispatcher.get(&npc, keys::SKIN).unwrap(), None);
    }

    #[test]
    fn client_skin_is_read_only() {
        let dispatcher = dispatcher();
        let mut mirror = Entity::human().on_side(Side::Client);
        assert_eq!(
            dispatcher.offer(&mut mirror, keys::SKIN, "textures/x".to_string()).status(),
            TransactionStatus::Failure
        );
        assert_eq!(
            dispatcher.remove(&mut mirror, keys::SKIN).status(),
            TransactionStatus::Failure
        );
    }
}
