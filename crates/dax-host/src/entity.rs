use std::any::Any;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use dax_types::{ContainerType, DataHolder};

use crate::block::BlockState;
use crate::extension::ExtensionMap;
use crate::projectile::ProjectileSource;
use crate::state::{FuseState, HealthScaling, SkinState, VanishState, CREEPER_FUSE, TNT_FUSE};
use crate::types;

// ---------------------------------------------------------------------------
// EntityId / Side
// ---------------------------------------------------------------------------

/// Unique entity identifier (UUIDv7, time-ordered).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which replica of the world an entity lives in.
///
/// Client replicas mirror server state and must not be mutated directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Server,
    Client,
}

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// Account name; players cannot be renamed.
    pub profile_name: String,
}

/// Player-like NPC.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Human;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Arrow {
    pub shooter: ProjectileSource,
    pub knockback: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enderman {
    pub held_block: Option<BlockState>,
    pub screaming: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Creeper {
    pub powered: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimedTnt;

/// Variant data of an [`Entity`].
#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Player(Player),
    Human(Human),
    Arrow(Arrow),
    Enderman(Enderman),
    Creeper(Creeper),
    PrimedTnt(PrimedTnt),
}

impl EntityKind {
    pub fn container_type(&self) -> &'static ContainerType {
        match self {
            Self::Player(_) => &types::PLAYER,
            Self::Human(_) => &types::HUMAN,
            Self::Arrow(_) => &types::ARROW,
            Self::Enderman(_) => &types::ENDERMAN,
            Self::Creeper(_) => &types::CREEPER,
            Self::PrimedTnt(_) => &types::PRIMED_TNT,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// A world entity.
///
/// Common state lives on the struct, variant state in [`EntityKind`], and
/// state owned by the value layer in the [`ExtensionMap`].
#[derive(Debug)]
pub struct Entity {
    id: EntityId,
    side: Side,
    custom_name: Option<String>,
    kind: EntityKind,
    extensions: ExtensionMap,
}

impl Entity {
    /// Spawn an entity on the server with its extension state initialised.
    pub fn spawn(kind: EntityKind) -> Self {
        let mut extensions = ExtensionMap::new();
        extensions.insert(VanishState::default());
        match &kind {
            EntityKind::Player(_) => {
                extensions.insert(HealthScaling::default());
                extensions.insert(SkinState::default());
            }
            EntityKind::Human(_) => {
                extensions.insert(SkinState::default());
            }
            EntityKind::Creeper(_) => {
                extensions.insert(FuseState::unprimed(CREEPER_FUSE));
            }
            EntityKind::PrimedTnt(_) => {
                extensions.insert(FuseState::primed(TNT_FUSE));
            }
            EntityKind::Arrow(_) | EntityKind::Enderman(_) => {}
        }
        Self {
            id: EntityId::new(),
            side: Side::Server,
            custom_name: None,
            kind,
            extensions,
        }
    }

    pub fn player(profile_name: impl Into<String>) -> Self {
        Self::spawn(EntityKind::Player(Player {
            profile_name: profile_name.into(),
        }))
    }

    pub fn human() -> Self {
        Self::spawn(EntityKind::Human(Human))
    }

    pub fn arrow() -> Self {
        Self::spawn(EntityKind::Arrow(Arrow::default()))
    }

    pub fn enderman() -> Self {
        Self::spawn(EntityKind::Enderman(Enderman::default()))
    }

    pub fn creeper() -> Self {
        Self::spawn(EntityKind::Creeper(Creeper::default()))
    }

    pub fn primed_tnt() -> Self {
        Self::spawn(EntityKind::PrimedTnt(PrimedTnt))
    }

    /// Move this entity to another replica side.
    pub fn on_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn is_client(&self) -> bool {
        self.side == Side::Client
    }

    pub fn kind(&self) -> &EntityKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut EntityKind {
        &mut self.kind
    }

    pub fn custom_name(&self) -> Option<&str> {
        self.custom_name.as_deref()
    }

    /// Replace the custom name, returning the previous one.
    pub fn set_custom_name(&mut self, name: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.custom_name, name)
    }

    pub fn extensions(&self) -> &ExtensionMap {
        &self.extensions
    }

    pub fn extensions_mut(&mut self) -> &mut ExtensionMap {
        &mut self.extensions
    }
}

impl DataHolder for Entity {
    fn container_type(&self) -> &'static ContainerType {
        self.kind.container_type()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.kind.container_type(), self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_report_their_container_type() {
        assert_eq!(Entity::player("Notch").container_type(), &types::PLAYER);
        assert_eq!(Entity::creeper().container_type(), &types::CREEPER);
        assert_eq!(Entity::primed_tnt().container_type(), &types::PRIMED_TNT);
        assert_eq!(Entity::arrow().container_type(), &types::ARROW);
    }

    #[test]
    fn spawn_initialises_extension_state() {
        let player = Entity::player("Notch");
        assert!(player.extensions().contains::<VanishState>());
        assert!(player.extensions().contains::<HealthScaling>());
        assert!(player.extensions().contains::<SkinState>());
        assert!(!player.extensions().contains::<FuseState>());

        let creeper = Entity::creeper();
        assert_eq!(
            creeper.extensions().get::<FuseState>(),
            Some(&FuseState::unprimed(CREEPER_FUSE))
        );
        let tnt = Entity::primed_tnt();
        assert!(tnt.extensions().get::<FuseState>().is_some_and(FuseState::is_primed));
    }

    #[test]
    fn entities_have_distinct_ids() {
        assert_ne!(Entity::arrow().id(), Entity::arrow().id());
    }

    #[test]
    fn side_and_name() {
        let mut npc = Entity::human().on_side(Side::Client);
        assert!(npc.is_client());
        assert_eq!(npc.set_custom_name(Some("Bob".into())), None);
        assert_eq!(npc.custom_name(), Some("Bob"));
        assert!(npc.to_string().starts_with("human["));
    }
}
