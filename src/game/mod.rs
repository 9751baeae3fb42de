//! Game simulation modules

pub mod behavior;
pub mod charge;
pub mod combat;
pub mod entity;
pub mod events;
pub mod r#match;
pub mod profile;
pub mod snapshot;
pub mod weapon;

pub use entity::{Combatant, Projectile, ProjectileKind, Side};
pub use events::GameEvent;
pub use profile::{ShipType, WeaponProfile};
pub use r#match::{DuelMatch, MatchPhase, MatchSettings};
pub use snapshot::{CombatantSummary, NetworkSnapshot, ProjectileSummary};

use serde::{Deserialize, Serialize};

/// Arena width in pixels
pub const ARENA_WIDTH: f32 = 1280.0;
/// Arena height in pixels
pub const ARENA_HEIGHT: f32 = 720.0;
/// Side length of every ship's bounding box
pub const SHIP_SIZE: f32 = 40.0;
/// Unit projectile size; projectiles start at twice this
pub const BULLET_SIZE: f32 = 6.0;
/// Projectile speed multiplier applied on top of profile speeds
pub const BULLET_SPEED_MULT: f32 = 1.5;
/// Distance in front of the hull where projectiles spawn
pub const SPAWN_FORWARD: f32 = 15.0;
/// Ships keep this far from the arena edges and the centre line
pub const EDGE_MARGIN: f32 = 50.0;
/// Projectiles expire this far outside the arena
pub const EXIT_MARGIN: f32 = 200.0;
/// Charge counter cap, in steps
pub const MAX_CHARGE_STEPS: u32 = 60;
/// Releases shorter than this many steps resolve as taps
pub const TAP_THRESHOLD: u32 = 6;
/// Horizontal push applied to a ship on hit
pub const KNOCKBACK: f32 = 12.0;

/// The five boolean controls a combatant receives each step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub left: bool,
    #[serde(default)]
    pub right: bool,
    #[serde(default)]
    pub fire: bool,
}

impl ControlState {
    pub const IDLE: ControlState = ControlState {
        up: false,
        down: false,
        left: false,
        right: false,
        fire: false,
    };
}
