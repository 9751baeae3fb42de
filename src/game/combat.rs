//! Combat system - hit detection and damage

use super::entity::{Combatant, Projectile, ProjectileKind, Rect, Side};
use super::events::GameEvent;
use super::profile::ShipType;
use super::{ARENA_HEIGHT, ARENA_WIDTH};

/// Result of resolving one projectile for one step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitResult {
    /// Projectile should be removed at the end of the step
    pub consumed: bool,
    /// Side whose ship was destroyed
    pub killed: Option<Side>,
}

/// Combat system for resolving projectiles against ships
pub struct CombatSystem;

impl CombatSystem {
    /// Resolve `projectile` against both ships, pushing notifications into `events`
    pub fn resolve(
        projectile: &mut Projectile,
        ships: &mut [Combatant; 2],
        events: &mut Vec<GameEvent>,
    ) -> HitResult {
        let mut kind = projectile.kind;
        let result = match &mut kind {
            ProjectileKind::Beam(beam) => {
                if beam.damage_applied {
                    return HitResult::default();
                }
                beam.damage_applied = true;
                Self::beam(projectile, ships, events)
            }
            ProjectileKind::Mine(mine) => {
                // Mines still collide like any projectile, exploding or not
                let mut result = Self::generic(projectile, ships, events);
                if result.killed.is_none() && mine.exploding && !mine.explosion_applied {
                    mine.explosion_applied = true;
                    result.killed =
                        Self::mine_blast(mine.radius(), projectile.x, projectile.y, ships, events);
                }
                result
            }
            _ => Self::generic(projectile, ships, events),
        };
        projectile.kind = kind;
        result
    }

    /// Half-arena rectangle in front of a beam's origin
    pub fn beam_area(x: f32, direction: i32) -> Rect {
        if direction > 0 {
            Rect::new(x, 0.0, ARENA_WIDTH - x, ARENA_HEIGHT)
        } else {
            Rect::new(0.0, 0.0, x, ARENA_HEIGHT)
        }
    }

    /// Damage dealt by a mine blast at `dist` from its centre
    pub fn blast_hits(dist: f32, radius: f32) -> u32 {
        let scale = 1.0 - dist / radius;
        ((3.0 * scale).floor() as u32).max(1)
    }

    fn generic(
        projectile: &Projectile,
        ships: &mut [Combatant; 2],
        events: &mut Vec<GameEvent>,
    ) -> HitResult {
        let victim = Side::targeted_by(projectile.direction);
        let ship = &mut ships[victim.index()];
        if !projectile.bounds().overlaps(&ship.bounds()) {
            return HitResult::default();
        }

        let killed = Self::strike(ship, projectile, events);
        ship.knock_back();
        HitResult {
            consumed: true,
            killed: killed.then_some(victim),
        }
    }

    /// One-shot test of the area in front of the emitter; no knockback
    fn beam(
        projectile: &Projectile,
        ships: &mut [Combatant; 2],
        events: &mut Vec<GameEvent>,
    ) -> HitResult {
        let victim = Side::targeted_by(projectile.direction);
        let ship = &mut ships[victim.index()];
        let area = Self::beam_area(projectile.x, projectile.direction);
        if !area.overlaps(&ship.bounds()) {
            return HitResult::default();
        }

        let killed = Self::strike(ship, projectile, events);
        HitResult {
            consumed: false,
            killed: killed.then_some(victim),
        }
    }

    /// One unit of damage; returns true on death
    fn strike(ship: &mut Combatant, projectile: &Projectile, events: &mut Vec<GameEvent>) -> bool {
        events.push(GameEvent::Hit {
            attacker: projectile.owner,
            victim: ship.side,
            x: projectile.x,
            y: projectile.y,
        });
        let died = ship.take_damage();
        if died {
            events.push(GameEvent::ShipExplosion {
                victim: ship.side,
                x: ship.x,
                y: ship.y,
            });
        }
        died
    }

    /// Distance-scaled damage to every ship within `radius`, applied once per mine
    fn mine_blast(
        radius: f32,
        x: f32,
        y: f32,
        ships: &mut [Combatant; 2],
        events: &mut Vec<GameEvent>,
    ) -> Option<Side> {
        if radius <= 0.0 {
            return None;
        }

        for ship in ships.iter_mut() {
            let dist = (ship.x - x).hypot(ship.y - y);
            if dist > radius {
                continue;
            }

            events.push(GameEvent::Hit {
                attacker: ShipType::Kombuz,
                victim: ship.side,
                x: ship.x,
                y: ship.y,
            });
            for _ in 0..Self::blast_hits(dist, radius) {
                if ship.take_damage() {
                    events.push(GameEvent::ShipExplosion {
                        victim: ship.side,
                        x: ship.x,
                        y: ship.y,
                    });
                    return Some(ship.side);
                }
            }
        }
        None
    }
}
