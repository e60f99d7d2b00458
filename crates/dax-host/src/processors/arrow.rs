use dax_processor::{ProcessorResult, ValueProcessor};
use dax_types::{ContainerType, Key};

use super::wrong_variant;
use crate::entity::{Arrow, Entity, EntityKind};
use crate::keys;
use crate::projectile::ProjectileSource;
use crate::types;

fn arrow<'a>(entity: &'a Entity, key: &'static str) -> ProcessorResult<&'a Arrow> {
    match entity.kind() {
        EntityKind::Arrow(arrow) => Ok(arrow),
        other => Err(wrong_variant(key, other)),
    }
}

fn arrow_mut<'a>(entity: &'a mut Entity, key: &'static str) -> ProcessorResult<&'a mut Arrow> {
    match entity.kind_mut() {
        EntityKind::Arrow(arrow) => Ok(arrow),
        other => Err(wrong_variant(key, other)),
    }
}

/// Who shot the arrow. Unknown until set.
pub struct ShooterProcessor;

impl ValueProcessor for ShooterProcessor {
    type Container = Entity;
    type Value = ProjectileSource;

    fn key(&self) -> Key<ProjectileSource> {
        keys::SHOOTER
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ARROW
    }

    fn default_value(&self) -> ProjectileSource {
        ProjectileSource::Unknown
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<ProjectileSource>> {
        Ok(Some(arrow(entity, self.key().id())?.shooter))
    }

    fn set(&self, entity: &mut Entity, value: ProjectileSource) -> ProcessorResult<bool> {
        if entity.is_client() {
            return Ok(false);
        }
        let arrow = arrow_mut(entity, self.key().id())?;
        if arrow.shooter == value {
            return Ok(false);
        }
        arrow.shooter = value;
        Ok(true)
    }
}

/// Knockback enchantment level. Never negative.
pub struct KnockbackStrengthProcessor;

impl ValueProcessor for KnockbackStrengthProcessor {
    type Container = Entity;
    type Value = i32;

    fn key(&self) -> Key<i32> {
        keys::KNOCKBACK_STRENGTH
    }

    fn container_type(&self) -> &'static ContainerType {
        &types::ARROW
    }

    fn default_value(&self) -> i32 {
        0
    }

    fn get(&self, entity: &Entity) -> ProcessorResult<Option<i32>> {
        Ok(Some(arrow(entity, self.key().id())?.knockback))
    }

    fn set(&self, entity: &mut Entity, value: i32) -> ProcessorResult<bool> {
        if entity.is_client() || value < 0 {
            return Ok(false);
        }
        let arrow = arrow_mut(entity, self.key().id())?;
        if arrow.knockback == value {
            return Ok(false);
        }
        arrow.knockback = value;
        Ok(true)
    }
}
