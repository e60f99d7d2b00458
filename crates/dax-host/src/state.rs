//! Extension state kept in an entity's [`crate::ExtensionMap`].

/// Fuse length of a freshly spawned creeper, in ticks.
pub const CREEPER_FUSE: i32 = 30;
/// Fuse length of primed TNT, in ticks.
pub const TNT_FUSE: i32 = 80;

/// Vanish flags shared by every entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VanishState {
    pub vanished: bool,
    /// Whether mobs ignore the entity while it is vanished.
    pub untargetable: bool,
}

/// Fuse of a fused explosive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FuseState {
    pub duration: i32,
    /// Ticks left until detonation; `None` while not primed.
    pub remaining: Option<i32>,
}

impl FuseState {
    pub fn unprimed(duration: i32) -> Self {
        Self {
            duration,
            remaining: None,
        }
    }

    pub fn primed(duration: i32) -> Self {
        Self {
            duration,
            remaining: Some(duration),
        }
    }

    pub fn is_primed(&self) -> bool {
        self.remaining.is_some()
    }

    /// Burn one tick. Returns `true` when the fuse runs out.
    pub fn tick(&mut self) -> bool {
        match &mut self.remaining {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                *remaining == 0
            }
            Some(_) => true,
            None => false,
        }
    }
}

/// Client-side health bar scaling of a player.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthScaling {
    /// Health shown to the client, or `None` for the real value.
    pub scale: Option<f64>,
}

/// Skin of a skinnable entity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkinState {
    /// Skin texture id, or `None` for the default skin.
    pub skin: Option<String>,
}
