//! Container type hierarchy of the host model.
//!
//! `ENTITY` is the root of every entity variant. `FUSED_EXPLOSIVE` and
//! `SKINNABLE` are capabilities: they have no parent and are attached to the
//! variants that have the behaviour.

use dax_types::container_type;

container_type!(
    /// Any entity.
    pub static ENTITY = "entity"
);

container_type!(
    /// Explosive with a fuse that can be primed and defused.
    pub static FUSED_EXPLOSIVE = "fused_explosive"
);

container_type!(
    /// Entity rendered with a player skin.
    pub static SKINNABLE = "skinnable"
);

container_type!(pub static PLAYER = "player": ENTITY, SKINNABLE);
container_type!(pub static HUMAN = "human": ENTITY, SKINNABLE);
container_type!(pub static ARROW = "arrow": ENTITY);
container_type!(pub static ENDERMAN = "enderman": ENTITY);
container_type!(pub static CREEPER = "creeper": ENTITY, FUSED_EXPLOSIVE);
container_type!(pub static PRIMED_TNT = "primed_tnt": ENTITY, FUSED_EXPLOSIVE);
