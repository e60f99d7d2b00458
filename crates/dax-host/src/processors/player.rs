use dax_processor::{ProcessorResult, ValueProcessor};
use dax_transaction::TransactionResult;
use dax_types::{ContainerType, Key};

use super::{client_removal, extension, extension_mut, removed, wrong_variant};
use crate::entity::{Entity, EntityKind};
use crate::keys;
use crate::state::HealthScaling;
use crate::types;

/// Largest accepted health scale.
pub const MAX_HEALTH_SCALE: f64 = f32::MAX as f64;

/// Vanilla number of health points shown to a client.
pub const DEFAULT_HEALTH_SCALE: f64 = 20.0;

// ---------------------------------------------------------------------------
// Display name
// ---------------------------------------------------------------------------

/// Players are always shown under their profile name.
///
/// Registered for `PLAYER`, which makes it more specific than the general
/// entity display name processor for players. Renames are rejected; offering
/// the current profile name is a successful no-op.
pub struct PlayerDisplayNameProcessor;

impl ValueProcessor for PlayerDisplayNameProcessor {
    type Container = Entity;
    type Value = String;

    fn key(&self) -> Key<String> {
        keys::DISPLAY_NAME
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::PLAYER
    }

    fn default_value(&self) -> String {
        String::new()
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<String>> {
        match entity.kind() {
            EntityKind::Player(player) => Ok(Some(player.profile_name.clone())),
            other => Err(wrong_variant(self.key().id(), other)),
        }
    }

    fn set(&self, _entity: &mut Entity, _value: String) -> ProcessorResult<bool> {
        Ok(false)
    }
}

// ---------------------------------------------------------------------------
// Health scale
// ---------------------------------------------------------------------------

/// Health shown to the player's client. Absent while unscaled; removing it
/// restores the real value.
pub struct HealthScaleProcessor;

impl ValueProcessor for HealthScaleProcessor {
    type Container = Entity;
    type Value = f64;

    fn key(&self) -> Key<f64> {
        keys::HEALTH_SCALE
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::PLAYER
    }

    fn default_value(&self) -> f64 {
        DEFAULT_HEALTH_SCALE
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<f64>> {
        Ok(extension::<HealthScaling>(entity, self.key().id())?.scale)
    }

    fn set(&self, entity: &mut Entity, value: f64) -> ProcessorResult<bool> {
        if entity.is_client() || !(1.0..=MAX_HEALTH_SCALE).contains(&value) {
            return Ok(false);
        }
        let scaling = extension_mut::<HealthScaling>(entity, self.key().id())?;
        if scaling.scale == Some(value) {
            return Ok(false);
        }
        scaling.scale = Some(value);
        Ok(true)
    }

    fn remove(&self, entity: &mut Entity) -> ProcessorResult<TransactionResult> {
        if entity.is_client() {
            return Ok(client_removal());
        }
        let scaling = extension_mut::<HealthScaling>(entity, self.key().id())?;
        Ok(match scaling.scale.take() {
            Some(old) => removed(self, old),
            None => TransactionResult::fail_no_data(),
        })
    }
}

#[cfg(test)]
mod tests {
    use dax_transaction::TransactionStatus;

    use super::*;
    use crate::processors::testing::dispatcher;

    // -----------------------------------------------------------------------
    // 1. Display name specificity
    // -----------------------------------------------------------------------

    #[test]
    fn player_reports_profile_name() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Alex");
        player.set_custom_name(Some("ignored".into()));
        assert_eq!(
            dispatcher.get(&player, keys::DISPLAY_NAME).unwrap(),
            Some("Alex".to_string())
        );
    }

    #[test]
    fn player_rename_rejected() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Alex");

        let rename = dispatcher.offer(&mut player, keys::DISPLAY_NAME, "Herobrine".to_string());
        assert_eq!(rename.status(), TransactionStatus::Failure);
        assert_eq!(player.custom_name(), None);

        let same = dispatcher.offer(&mut player, keys::DISPLAY_NAME, "Alex".to_string());
        assert!(same.is_successful());
        assert!(same.replaced().is_empty());
    }

    #[test]
    fn other_skinnables_use_entity_display_name() {
        let dispatcher = dispatcher();
        let mut npc = Entity::human();
        let result = dispatcher.offer(&mut npc, keys::DISPLAY_NAME, "Guide".to_string());
        assert!(result.is_successful());
        assert_eq!(npc.custom_name(), Some("Guide"));
    }

    #[test]
    fn player_display_name_not_removable() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Alex");
        assert_eq!(
            dispatcher.remove(&mut player, keys::DISPLAY_NAME).status(),
            TransactionStatus::NoData
        );
    }

    // -----------------------------------------------------------------------
    // 2. Health scale
    // -----------------------------------------------------------------------

    #[test]
    fn health_scale_set_and_reset() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Alex");
        assert_eq!(dispatcher.get(&player, keys::HEALTH_SCALE).unwrap(), None);

        assert!(dispatcher.offer(&mut player, keys::HEALTH_SCALE, 40.0).is_successful());
        let value = dispatcher.get_value(&player, keys::HEALTH_SCALE).unwrap().unwrap();
        assert_eq!(*value.get(), 40.0);
        assert_eq!(*value.default(), DEFAULT_HEALTH_SCALE);

        let reset = dispatcher.remove(&mut player, keys::HEALTH_SCALE);
        assert_eq!(reset.replaced_value(keys::HEALTH_SCALE), Some(40.0));
        assert_eq!(
            dispatcher.remove(&mut player, keys::HEALTH_SCALE).status(),
            TransactionStatus::NoData
        );
    }

    #[test]
    fn health_scale_bounds() {
        let dispatcher = dispatcher();
        let mut player = Entity::player("Alex");
        for rejected in [0.0, 0.5, -3.0, f64::NAN, f64::INFINITY] {
            let result = dispatcher.offer(&mut player, keys::HEALTH_SCALE, rejected);
            assert_eq!(result.status(), TransactionStatus::Failure, "{rejected}");
        }
        assert!(dispatcher.offer(&mut player, keys::HEALTH_SCALE, 1.0).is_successful());
    }

    #[test]
    fn health_scale_only_on_players() {
        let dispatcher = dispatcher();
        let mut npc = Entity::human();
        assert_eq!(
            dispatcher.offer(&mut npc, keys::HEALTH_SCALE, 10.0).status(),
            TransactionStatus::NoData
        );
    }
}
