//! Snapshot building for network transmission

use serde::{Deserialize, Serialize};

use super::entity::{Combatant, Projectile};
use super::profile::ShipType;

/// Replicated view of one combatant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub x: f32,
    pub y: f32,
    pub health: i32,
    /// Ammunition left
    pub bullets: u32,
    #[serde(rename = "type")]
    pub ship_type: ShipType,
}

impl From<&Combatant> for CombatantSummary {
    fn from(ship: &Combatant) -> Self {
        Self {
            x: ship.x,
            y: ship.y,
            health: ship.health,
            bullets: ship.ammo,
            ship_type: ship.ship_type,
        }
    }
}

/// Replicated view of one projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSummary {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub ship_type: ShipType,
    #[serde(default)]
    pub is_charged: bool,
}

impl From<&Projectile> for ProjectileSummary {
    fn from(p: &Projectile) -> Self {
        Self {
            x: p.x,
            y: p.y,
            w: p.width,
            h: p.height,
            ship_type: p.owner,
            is_charged: p.is_charged,
        }
    }
}

/// Point-in-time authoritative state.
///
/// Projectiles carry no identity; receivers replace the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub ship1: CombatantSummary,
    pub ship2: CombatantSummary,
    #[serde(default)]
    pub bullets: Vec<ProjectileSummary>,
}

impl NetworkSnapshot {
    pub fn capture(ships: &[Combatant; 2], projectiles: &[Projectile]) -> Self {
        Self {
            ship1: CombatantSummary::from(&ships[0]),
            ship2: CombatantSummary::from(&ships[1]),
            bullets: projectiles.iter().map(ProjectileSummary::from).collect(),
        }
    }
}

/// Snapshot send stats for debugging
#[derive(Debug, Default, Clone, Copy)]
pub struct SnapshotStats {
    pub total_snapshots: u64,
    pub total_bytes: u64,
    pub avg_bullets_per_snapshot: f32,
}

impl SnapshotStats {
    pub fn record(&mut self, bullet_count: usize, bytes: usize) {
        self.total_snapshots += 1;
        self.total_bytes += bytes as u64;

        // Running average
        let n = self.total_snapshots as f32;
        self.avg_bullets_per_snapshot =
            self.avg_bullets_per_snapshot * ((n - 1.0) / n) + (bullet_count as f32 / n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entity::{ProjectileKind, Side};

    #[test]
    fn captures_both_ships_and_projectiles() {
        let ships = [
            Combatant::spawn(ShipType::Osa, Side::Left),
            Combatant::spawn(ShipType::Rift, Side::Right),
        ];
        let shot = Projectile::new(ShipType::Osa, 200.0, 300.0, 1, Some(2), ProjectileKind::Straight);

        let snap = NetworkSnapshot::capture(&ships, &[shot]);
        assert_eq!(snap.ship1.bullets, 16);
        assert_eq!(snap.ship2.ship_type, ShipType::Rift);
        assert_eq!(snap.bullets.len(), 1);
        assert_eq!(snap.bullets[0].w, 18.0);
        assert!(snap.bullets[0].is_charged);
    }

    #[test]
    fn combatant_type_uses_wire_key() {
        let summary = CombatantSummary::from(&Combatant::spawn(ShipType::Komar, Side::Left));
        let json = serde_json::to_value(summary).unwrap();
        assert_eq!(json["type"], "Komar");
        assert_eq!(json["bullets"], 4);
    }

    #[test]
    fn stats_track_running_average() {
        let mut stats = SnapshotStats::default();
        stats.record(2, 100);
        stats.record(4, 300);
        assert_eq!(stats.total_snapshots, 2);
        assert_eq!(stats.total_bytes, 400);
        assert!((stats.avg_bullets_per_snapshot - 3.0).abs() < 1e-6);
    }
}
