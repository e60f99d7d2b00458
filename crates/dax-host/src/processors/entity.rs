//! Processors declared for every entity.

use dax_processor::{ProcessorResult, ValueProcessor};
use dax_transaction::TransactionResult;
use dax_types::{ContainerType, Key};

use super::{client_removal, extension, extension_mut, removed};
use crate::entity::Entity;
use crate::keys;
use crate::state::VanishState;
use crate::types;

// ---------------------------------------------------------------------------
// Invisibility prevents targeting
// ---------------------------------------------------------------------------

/// Whether mobs ignore the entity while it is vanished.
///
/// Only meaningful for vanished entities: offers on a visible entity are
/// rejected. Not removable.
pub struct InvisibilityTargetProcessor;

impl ValueProcessor for InvisibilityTargetProcessor {
    type Container = Entity;
    type Value = bool;

    fn key(&self) -> Key<bool> {
        keys::INVISIBILITY_PREVENTS_TARGETING
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ENTITY
    }

    fn default_value(&self) -> bool {
        false
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<bool>> {
        let state = extension::<VanishState>(entity, self.key().id())?;
        Ok(Some(state.untargetable))
    }

    fn set(&self, entity: &mut Entity, value: bool) -> ProcessorResult<bool> {
        if entity.is_client() {
            return Ok(false);
        }
        let state = extension_mut::<VanishState>(entity, self.key().id())?;
        if !state.vanished || state.untargetable == value {
            return Ok(false);
        }
        state.untargetable = value;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Vanish
// ---------------------------------------------------------------------------

/// Hides the entity from other players. Becoming visible again also clears
/// the untargetable flag.
pub struct VanishProcessor;

impl ValueProcessor for VanishProcessor {
    type Container = Entity;
    type Value = bool;

    fn key(&self) -> Key<bool> {
        keys::VANISH
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ENTITY
    }

    fn default_value(&self) -> bool {
        false
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<bool>> {
        let state = extension::<VanishState>(entity, self.key().id())?;
        Ok(Some(state.vanished))
    }

    fn set(&self, entity: &mut Entity, value: bool) -> ProcessorResult<bool> {
        if entity.is_client() {
            return Ok(false);
        }
        let state = extension_mut::<VanishState>(entity, self.key().id())?;
        if state.vanished == value {
            return Ok(false);
        }
        state.vanished = value;
        if !value {
            state.untargetable = false;
        }
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// Display name
// ---------------------------------------------------------------------------

/// Custom name shown above the entity. Absent until one is set; removable.
pub struct DisplayNameProcessor;

impl ValueProcessor for DisplayNameProcessor {
    type Container = Entity;
    type Value = String;

    fn key(&self) -> Key<String> {
        keys::DISPLAY_NAME
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ENTITY
    }

    fn default_value(&self) -> String {
        String::new()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<String>> {
        Ok(entity.custom_name().map(str::to_string))
    }

    fn set(&self, entity: &mut Entity, value: String) -> ProcessorResult<bool> {
        if entity.is_client() || entity.custom_name() == Some(value.as_str()) {
            return Ok(false);
        }
        entity.set_custom_name(Some(value));
        Ok(true)
    }

    fn remove(&self, entity: &mut Entity) -> ProcessorResult<TransactionResult> {
        if entity.is_client() {
            return Ok(client_removal());
        }
        Ok(match entity.set_custom_name(None) {
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

    // -----------------------------------------------------------------------
    // 1. Invisibility prevents targeting
    // -----------------------------------------------------------------------

    #[test]
    fn untargetable_requires_vanish() {
        let dispatcher = dispatcher();
        let mut creeper = Entity::creeper();

        let result = dispatcher.offer(&mut creeper, keys::INVISIBILITY_PREVENTS_TARGETING, true);
        assert_eq!(result.status(), TransactionStatus::Failure);
        assert_eq!(
            result.rejected_value(keys::INVISIBILITY_PREVENTS_TARGETING),
            Some(true)
        );
        assert_eq!(
            dispatcher.get(&creeper, keys::INVISIBILITY_PREVENTS_TARGETING).unwrap(),
            Some(false)
        );
    }

    #[test]
    fn vanished_entity_becomes_untargetable() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Steve");
        assert!(dispatcher.offer(&mut player, keys::VANISH, true).is_successful());

        let result = dispatcher.offer(&mut player, keys::INVISIBILITY_PREVENTS_TARGETING, true);
        assert!(result.is_successful());
        assert_eq!(
            result.replaced_value(keys::INVISIBILITY_PREVENTS_TARGETING),
            Some(false)
        );
        assert_eq!(
            dispatcher.get(&player, keys::INVISIBILITY_PREVENTS_TARGETING).unwrap(),
            Some(true)
        );
    }

    #[test]
    fn client_replica_is_read_only() {
        let dispatcher = dispatcher();
        let mut mirror = Entity::arrow().on_side(Side::Client);
        mirror
            .extensions_mut()
            .insert(VanishState { vanished: true, untargetable: false });

        let result = dispatcher.offer(&mut mirror, keys::INVISIBILITY_PREVENTS_TARGETING, true);
        assert_eq!(result.status(), TransactionStatus::Failure);
        assert_eq!(
            dispatcher.get(&mirror, keys::INVISIBILITY_PREVENTS_TARGETING).unwrap(),
            Some(false)
        );
    }

    #[test]
    fn untargetable_is_not_removable() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        let result = dispatcher.remove(&mut enderman, keys::INVISIBILITY_PREVENTS_TARGETING);
        assert_eq!(result.status(), TransactionStatus::NoData);
    }

    #[test]
    fn missing_state_is_a_fault() {
        let dispatcher = dispatcher();
        let mut arrow = Entity::arrow();
        arrow.extensions_mut().remove::<VanishState>();

        assert!(dispatcher.get(&arrow, keys::VANISH).is_err());
        let result = dispatcher.offer(&mut arrow, keys::VANISH, true);
        assert_eq!(result.status(), TransactionStatus::Error);
        assert!(result.fault().is_some());
    }

    // -----------------------------------------------------------------------
    // 2. Vanish
    // -----------------------------------------------------------------------

    #[test]
    fn reappearing_clears_untargetable() {
        let dispatcher = dispatcher();
        let mut human = Entity::human();
        dispatcher.offer(&mut human, keys::VANISH, true);
        dispatcher.offer(&mut human, keys::INVISIBILITY_PREVENTS_TARGETING, true);

        let result = dispatcher.offer(&mut human, keys::VANISH, false);
        assert!(result.is_successful());
        assert_eq!(
            dispatcher.get(&human, keys::INVISIBILITY_PREVENTS_TARGETING).unwrap(),
            Some(false)
        );
    }

    // -----------------------------------------------------------------------
    // 3. Display name
    // -----------------------------------------------------------------------

    #[test]
    fn display_name_absent_until_set() {
        let dispatcher = dispatcher();
        let mut creeper = Entity::creeper();
        assert_eq!(dispatcher.get(&creeper, keys::DISPLAY_NAME).unwrap(), None);

        let result = dispatcher.offer(&mut creeper, keys::DISPLAY_NAME, "Sparky".to_string());
        assert!(result.is_successful());
        assert!(result.replaced().is_empty());
        assert_eq!(creeper.custom_name(), Some("Sparky"));
    }

    #[test]
    fn display_name_remove_twice() {
        let dispatcher = dispatcher();
        let mut enderman = Entity::enderman();
        dispatcher.offer(&mut enderman, keys::DISPLAY_NAME, "Slender".to_string());

        let first = dispatcher.remove(&mut enderman, keys::DISPLAY_NAME);
        assert!(first.is_successful());
        assert_eq!(
            first.replaced_value(keys::DISPLAY_NAME),
            Some("Slender".to_string())
        );

        let second = dispatcher.remove(&mut enderman, keys::DISPLAY_NAME);
        assert_eq!(second.status(), TransactionStatus::NoData);
    }

    #[test]
    fn display_name_removal_refused_on_client() {
        let dispatcher = dispatcher();
        let mut mirror = Entity::creeper().on_side(Side::Client);
        mirror.set_custom_name(Some("Sparky".into()));
        let result = dispatcher.remove(&mut mirror, keys::DISPLAY_NAME);
        assert_eq!(result.status(), TransactionStatus::Failure);
        assert_eq!(mirror.custom_name(), Some("Sparky"));
    }
}
