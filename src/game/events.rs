//! Notifications emitted by the simulation for the audio/cosmetic layer

use super::entity::Side;
use super::profile::ShipType;

/// Something observable happened during a step.
///
/// Carries enough payload to place effects; the simulation itself never
/// renders or plays anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Weapon fired; one per dispatch
    Shoot { ship_type: ShipType, x: f32, y: f32 },
    /// Fire control started charging
    Charge { ship_type: ShipType, side: Side },
    /// Projectile connected with a ship
    Hit {
        attacker: ShipType,
        victim: Side,
        x: f32,
        y: f32,
    },
    /// A ship was destroyed
    ShipExplosion { victim: Side, x: f32, y: f32 },
    /// Mine settled and armed
    MineArm { x: f32, y: f32 },
    /// Mine explosion began
    MineExplode { x: f32, y: f32 },
    /// Charged boomerang sweep
    Sweep { ship_type: ShipType },
    /// Charged nova burst
    Nova { ship_type: ShipType },
}

impl GameEvent {
    /// Event name as the presentation layer keys it
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Shoot { .. } => "shoot",
            GameEvent::Charge { .. } => "charge",
            GameEvent::Hit { .. } => "hit",
            GameEvent::ShipExplosion { .. } => "ship_explosion",
            GameEvent::MineArm { .. } => "mine_arm",
            GameEvent::MineExplode { .. } => "mine_explode",
            GameEvent::Sweep { .. } => "sweep",
            GameEvent::Nova { .. } => "nova",
        }
    }

    /// Ship type qualifying the event, if any
    pub fn ship_type(&self) -> Option<ShipType> {
        match self {
            GameEvent::Shoot { ship_type, .. }
            | GameEvent::Charge { ship_type, .. }
            | GameEvent::Sweep { ship_type }
            | GameEvent::Nova { ship_type } => Some(*ship_type),
            GameEvent::Hit { attacker, .. } => Some(*attacker),
            GameEvent::MineArm { .. } | GameEvent::MineExplode { .. } => Some(ShipType::Kombuz),
            GameEvent::ShipExplosion { .. } => None,
        }
    }
}
