//! Built-in keys.

use dax_types::{Key, KeyDef, ValueKind};

use crate::block::BlockState;
use crate::projectile::ProjectileSource;

macro_rules! keys {
    ($($(#[$meta:meta])* $name:ident: $ty:ty = ($id:literal, $label:literal, $kind:ident);)+) => {
        $(
            $(#[$meta])*
            pub static $name: Key<$ty> = {
                static DEF: KeyDef = KeyDef::new($id, $label, ValueKind::$kind);
                Key::new(&DEF)
            };
        )+

        /// Every built-in key, in declaration order.
        pub fn all() -> Vec<&'static KeyDef> {
            vec![$($name.def()),+]
        }
    };
}

keys! {
    /// Whether mobs ignore a vanished entity.
    INVISIBILITY_PREVENTS_TARGETING: bool = ("dax:invisibility_prevents_targeting", "Invisibility Prevents Targeting", Bool);
    /// Whether the entity is hidden from other players.
    VANISH: bool = ("dax:vanish", "Vanish", Bool);
    DISPLAY_NAME: String = ("dax:display_name", "Display Name", Text);
    /// Fuse length in ticks.
    FUSE_DURATION: i32 = ("dax:fuse_duration", "Fuse Duration", Int);
    /// Ticks until a primed explosive detonates. Absent while unprimed.
    TICKS_REMAINING: i32 = ("dax:ticks_remaining", "Ticks Remaining", Int);
    HELD_BLOCK: BlockState = ("dax:held_block", "Held Block", Record);
    SCREAMING: bool = ("dax:screaming", "Screaming", Bool);
    SHOOTER: ProjectileSource = ("dax:shooter", "Shooter", Record);
    KNOCKBACK_STRENGTH: i32 = ("dax:knockback_strength", "Knockback Strength", Int);
    /// Health shown to a player's client.
    HEALTH_SCALE: f64 = ("dax:health_scale", "Health Scale", Double);
    SKIN: String = ("dax:skin", "Skin", Text);
}
