//! Client-side smoothing of replicated state

use crate::game::{CombatantSummary, NetworkSnapshot};

/// Default per-render-step blend factor
pub const DEFAULT_ALPHA: f32 = 0.22;

/// Blends the displayed combatant positions toward the latest snapshot.
///
/// Positions glide by `alpha` per render step; health, ammunition and type
/// snap to the authoritative value and the projectile list is replaced.
#[derive(Debug, Clone)]
pub struct SnapshotInterpolator {
    alpha: f32,
    view: Option<NetworkSnapshot>,
}

impl SnapshotInterpolator {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            view: None,
        }
    }

    /// Current smoothed view, if any snapshot has arrived
    pub fn view(&self) -> Option<&NetworkSnapshot> {
        self.view.as_ref()
    }

    /// Advance the view one render step toward `target`
    pub fn step(&mut self, target: &NetworkSnapshot) -> &NetworkSnapshot {
        let alpha = self.alpha;
        let view = self.view.get_or_insert_with(|| target.clone());
        blend(&mut view.ship1, &target.ship1, alpha);
        blend(&mut view.ship2, &target.ship2, alpha);
        view.bullets.clone_from(&target.bullets);
        view
    }
}

impl Default for SnapshotInterpolator {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}

fn lerp(current: f32, target: f32, alpha: f32) -> f32 {
    current + (target - current) * alpha
}

fn blend(view: &mut CombatantSummary, target: &CombatantSummary, alpha: f32) {
    view.x = lerp(view.x, target.x, alpha);
    view.y = lerp(view.y, target.y, alpha);
    view.health = target.health;
    view.bullets = target.bullets;
    view.ship_type = target.ship_type;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ProjectileSummary, ShipType};

    fn summary(x: f32, y: f32, health: i32) -> CombatantSummary {
        CombatantSummary {
            x,
            y,
            health,
            bullets: 6,
            ship_type: ShipType::Zaba,
        }
    }

    fn snap(x: f32, health: i32, bullets: usize) -> NetworkSnapshot {
        NetworkSnapshot {
            ship1: summary(x, 100.0, health),
            ship2: summary(1000.0, 100.0, 7),
            bullets: vec![
                ProjectileSummary {
                    x: 0.0,
                    y: 0.0,
                    w: 12.0,
                    h: 12.0,
                    ship_type: ShipType::Zaba,
                    is_charged: false,
                };
                bullets
            ],
        }
    }

    #[test]
    fn first_snapshot_is_adopted_as_is() {
        let mut interp = SnapshotInterpolator::default();
        assert!(interp.view().is_none());
        let view = interp.step(&snap(100.0, 7, 1));
        assert_eq!(view.ship1.x, 100.0);
    }

    #[test]
    fn positions_glide_and_discrete_fields_snap() {
        let mut interp = SnapshotInterpolator::new(0.25);
        interp.step(&snap(100.0, 7, 3));

        let view = interp.step(&snap(200.0, 4, 0));
        assert_eq!(view.ship1.x, 125.0);
        assert_eq!(view.ship1.health, 4);
        assert!(view.bullets.is_empty());

        let view = interp.step(&snap(200.0, 4, 2));
        assert_eq!(view.ship1.x, 143.75);
        assert_eq!(view.bullets.len(), 2);
    }
}
