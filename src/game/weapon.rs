//! Weapon strategies: turn a resolved release into projectiles

use std::f32::consts::TAU;

use super::charge::ReleaseEvent;
use super::entity::{BeamState, BoomerangState, Combatant, MineState, Projectile, ProjectileKind};
use super::events::GameEvent;
use super::profile::ShipType;
use super::{ARENA_WIDTH, SHIP_SIZE, SPAWN_FORWARD};

/// Where and which way a volley leaves the hull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub owner: ShipType,
    pub x: f32,
    pub y: f32,
    pub direction: i32,
}

impl Muzzle {
    pub fn of(ship: &Combatant) -> Self {
        let direction = ship.direction();
        Self {
            owner: ship.ship_type,
            x: ship.x + (SHIP_SIZE / 2.0 + SPAWN_FORWARD) * direction as f32,
            y: ship.y,
            direction,
        }
    }

    fn spawn(&self, dy: f32, release: &ReleaseEvent, kind: ProjectileKind) -> Projectile {
        Projectile::new(
            self.owner,
            self.x,
            self.y + dy,
            self.direction,
            release.charge_level(),
            kind,
        )
    }

    fn straight(&self, dy: f32, release: &ReleaseEvent) -> Projectile {
        self.spawn(dy, release, ProjectileKind::Straight)
    }
}

/// Projectiles produced by one release, plus an optional special cue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Volley {
    pub projectiles: Vec<Projectile>,
    pub cue: Option<GameEvent>,
}

impl From<Vec<Projectile>> for Volley {
    fn from(projectiles: Vec<Projectile>) -> Self {
        Self {
            projectiles,
            cue: None,
        }
    }
}

/// Per-type firing pattern
pub trait Weapon: Send + Sync {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley;
}

/// Fire `ship`'s weapon for `release`, pushing notifications into `events`
pub fn fire(ship: &Combatant, release: &ReleaseEvent, events: &mut Vec<GameEvent>) -> Vec<Projectile> {
    let muzzle = Muzzle::of(ship);
    let volley = ship.profile().armament.weapon().dispatch(&muzzle, release);

    events.push(GameEvent::Shoot {
        ship_type: muzzle.owner,
        x: muzzle.x,
        y: muzzle.y,
    });
    events.extend(volley.cue);

    volley.projectiles
}

/// Offset of slot `i` in a row of `n` centred on zero
fn centred(i: u32, n: u32) -> f32 {
    i as f32 - (n as f32 - 1.0) / 2.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SingleShot;

impl Weapon for SingleShot {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        vec![muzzle.straight(0.0, release)].into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwinSpread {
    pub tap_offset: f32,
    pub charged_spacing: f32,
    pub charged_max: u32,
}

impl Weapon for TwinSpread {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        if !release.is_charged() {
            return vec![
                muzzle.straight(-self.tap_offset, release),
                muzzle.straight(self.tap_offset, release),
            ]
            .into();
        }
        let n = release.cost.min(self.charged_max);
        (0..n)
            .map(|i| muzzle.straight((i as f32 - 1.0) * self.charged_spacing, release))
            .collect::<Vec<_>>()
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RapidFan {
    pub max_spawn: u32,
    pub spacing: f32,
}

impl Weapon for RapidFan {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        if !release.is_charged() {
            return vec![muzzle.straight(0.0, release)].into();
        }
        let n = release.cost.min(self.max_spawn);
        (0..n)
            .map(|i| muzzle.straight(centred(i, n) * self.spacing, release))
            .collect::<Vec<_>>()
            .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamEmitter {
    pub display_steps: u32,
}

impl Weapon for BeamEmitter {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        let shot = if release.is_charged() {
            muzzle.spawn(
                0.0,
                release,
                ProjectileKind::Beam(BeamState {
                    display_steps: self.display_steps,
                    damage_applied: false,
                }),
            )
        } else {
            muzzle.straight(0.0, release)
        };
        vec![shot].into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineLayer {
    /// Fraction of the arena width a mine covers before settling
    pub travel_fraction: f32,
    pub explosion_delay: u32,
    pub charged_explosion_delay: u32,
    pub explosion_steps: u32,
    pub radius_growth: f32,
}

impl Weapon for MineLayer {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        let settle_x = if muzzle.direction > 0 {
            ARENA_WIDTH * self.travel_fraction
        } else {
            ARENA_WIDTH * (1.0 - self.travel_fraction)
        };
        let fuse = if release.is_charged() {
            self.charged_explosion_delay
        } else {
            self.explosion_delay
        };
        let mine = MineState {
            settle_x,
            fuse,
            explosion_steps: self.explosion_steps,
            radius_growth: self.radius_growth,
            settled: false,
            exploding: false,
            explosion_timer: 0,
            explosion_applied: false,
        };
        vec![muzzle.spawn(0.0, release, ProjectileKind::Mine(mine))].into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoomerangLauncher {
    pub tap_offset: f32,
    pub sweep_angle_deg: f32,
    pub max_sweep: u32,
    pub return_distance: f32,
    pub return_speed: f32,
    /// Damage multiplier applied once the boomerang turns back
    pub return_damage: f32,
}

impl BoomerangLauncher {
    fn state(&self, angle: Option<f32>) -> ProjectileKind {
        ProjectileKind::Boomerang(BoomerangState {
            angle,
            return_distance: self.return_distance,
            return_speed: self.return_speed,
            return_damage: self.return_damage,
            distance_traveled: 0.0,
            is_returning: false,
        })
    }
}

impl Weapon for BoomerangLauncher {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        if !release.is_charged() {
            return [0.0, -self.tap_offset, self.tap_offset]
                .into_iter()
                .map(|dy| muzzle.spawn(dy, release, self.state(None)))
                .collect::<Vec<_>>()
                .into();
        }

        let n = release.cost.min(self.max_sweep);
        let sweep = self.sweep_angle_deg.to_radians();
        let projectiles = (0..n)
            .map(|i| {
                let angle = if n > 1 {
                    -sweep / 2.0 + sweep * i as f32 / (n - 1) as f32
                } else {
                    0.0
                };
                muzzle.spawn(0.0, release, self.state(Some(angle)))
            })
            .collect();

        Volley {
            projectiles,
            cue: Some(GameEvent::Sweep {
                ship_type: muzzle.owner,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarBurst {
    pub scatter_angle_deg: f32,
    pub nova_rays: u32,
}

impl Weapon for StarBurst {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        if !release.is_charged() {
            let half = (self.scatter_angle_deg / 2.0).to_radians();
            return [-half, 0.0, half]
                .into_iter()
                .map(|angle| muzzle.spawn(0.0, release, ProjectileKind::Scatter { angle }))
                .collect::<Vec<_>>()
                .into();
        }

        let rays = self.nova_rays;
        let projectiles = (0..rays)
            .map(|i| {
                let angle = TAU * i as f32 / rays as f32;
                muzzle.spawn(0.0, release, ProjectileKind::Nova { angle })
            })
            .collect();

        Volley {
            projectiles,
            cue: Some(GameEvent::Nova {
                ship_type: muzzle.owner,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossFire {
    pub dual_spacing: f32,
    pub cross_size: u32,
    pub cross_spread_deg: f32,
}

impl Weapon for CrossFire {
    fn dispatch(&self, muzzle: &Muzzle, release: &ReleaseEvent) -> Volley {
        if !release.is_charged() {
            let half = self.dual_spacing / 2.0;
            return vec![
                muzzle.straight(-half, release),
                muzzle.straight(half, release),
            ]
            .into();
        }
        let n = release.cost.min(self.cross_size);
        let spread = self.cross_spread_deg.to_radians();
        (0..n)
            .map(|i| {
                let angle = centred(i, n) * spread;
                muzzle.spawn(0.0, release, ProjectileKind::Scatter { angle })
            })
            .collect::<Vec<_>>()
            .into()
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::game::charge::ReleaseKind;
    use crate::game::entity::Side;

    const TAP: ReleaseEvent = ReleaseEvent {
        kind: ReleaseKind::Tap,
        cost: 1,
    };

    fn charged(cost: u32) -> ReleaseEvent {
        ReleaseEvent {
            kind: ReleaseKind::Charged,
            cost,
        }
    }

    fn fire_once(ship_type: ShipType, side: Side, release: ReleaseEvent) -> (Vec<Projectile>, Vec<GameEvent>) {
        let ship = Combatant::spawn(ship_type, side);
        let mut events = Vec::new();
        let shots = fire(&ship, &release, &mut events);
        (shots, events)
    }

    #[test]
    fn spawns_in_front_of_the_hull() {
        let (shots, events) = fire_once(ShipType::Zaba, Side::Left, TAP);
        assert_eq!(shots.len(), 1);
        assert_eq!(shots[0].x, 100.0 + 35.0);
        assert_eq!(shots[0].direction, 1);

        let (shots, _) = fire_once(ShipType::Zaba, Side::Right, TAP);
        assert_eq!(shots[0].x, ARENA_WIDTH - 100.0 - 35.0);
        assert_eq!(shots[0].direction, -1);

        assert_eq!(
            events,
            vec![GameEvent::Shoot {
                ship_type: ShipType::Zaba,
                x: 135.0,
                y: 360.0
            }]
        );
    }

    #[test]
    fn every_dispatch_emits_exactly_one_shoot() {
        for ship_type in ShipType::ALL {
            for release in [TAP, charged(3)] {
                let (_, events) = fire_once(ship_type, Side::Left, release);
                let shoots = events
                    .iter()
                    .filter(|e| matches!(e, GameEvent::Shoot { .. }))
                    .count();
                assert_eq!(shoots, 1, "{ship_type} {release:?}");
            }
        }
    }

    #[test]
    fn rekin_patterns() {
        let (shots, _) = fire_once(ShipType::Rekin, Side::Left, TAP);
        let ys: Vec<f32> = shots.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![352.0, 368.0]);

        let (shots, _) = fire_once(ShipType::Rekin, Side::Left, charged(6));
        let ys: Vec<f32> = shots.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![348.0, 360.0, 372.0]);
        assert!(shots.iter().all(|p| p.is_charged && p.charge_level == 6));
    }

    #[test]
    fn osa_fan_is_symmetric() {
        let (shots, _) = fire_once(ShipType::Osa, Side::Left, charged(16));
        assert_eq!(shots.len(), 7);
        let ys: Vec<f32> = shots.iter().map(|p| p.y - 360.0).collect();
        assert_eq!(ys, vec![-24.0, -16.0, -8.0, 0.0, 8.0, 16.0, 24.0]);

        let (shots, _) = fire_once(ShipType::Osa, Side::Left, charged(2));
        let ys: Vec<f32> = shots.iter().map(|p| p.y - 360.0).collect();
        assert_eq!(ys, vec![-4.0, 4.0]);
    }

    #[test]
    fn komar_charged_is_a_beam() {
        let (shots, _) = fire_once(ShipType::Komar, Side::Left, charged(2));
        assert_eq!(shots.len(), 1);
        assert!(shots[0].is_beam());

        let (shots, _) = fire_once(ShipType::Komar, Side::Left, TAP);
        assert!(!shots[0].is_beam());
    }

    #[test]
    fn kombuz_mines_settle_on_the_far_side() {
        let (shots, _) = fire_once(ShipType::Kombuz, Side::Left, TAP);
        let ProjectileKind::Mine(mine) = shots[0].kind else {
            panic!("expected a mine");
        };
        assert_eq!(mine.settle_x, ARENA_WIDTH * 0.6);
        assert_eq!(mine.fuse, 180);

        let (shots, _) = fire_once(ShipType::Kombuz, Side::Right, charged(3));
        let ProjectileKind::Mine(mine) = shots[0].kind else {
            panic!("expected a mine");
        };
        assert!((mine.settle_x - ARENA_WIDTH * 0.4).abs() < 1e-3);
        assert_eq!(mine.fuse, 240);
    }

    #[test]
    fn rift_sweep_spans_the_arc() {
        let (shots, events) = fire_once(ShipType::Rift, Side::Left, charged(8));
        assert_eq!(shots.len(), 5);
        let angles: Vec<f32> = shots
            .iter()
            .map(|p| match p.kind {
                ProjectileKind::Boomerang(b) => b.angle.unwrap_or(f32::NAN),
                _ => f32::NAN,
            })
            .collect();
        let expected = [-60.0f32, -30.0, 0.0, 30.0, 60.0];
        for (got, want) in angles.iter().zip(expected) {
            assert!((got - want.to_radians()).abs() < 1e-5);
        }
        assert!(events.contains(&GameEvent::Sweep {
            ship_type: ShipType::Rift
        }));

        let (shots, _) = fire_once(ShipType::Rift, Side::Left, charged(1));
        assert!(matches!(
            shots[0].kind,
            ProjectileKind::Boomerang(BoomerangState { angle: Some(a), .. }) if a == 0.0
        ));

        let (shots, events) = fire_once(ShipType::Rift, Side::Left, TAP);
        let ys: Vec<f32> = shots.iter().map(|p| p.y - 360.0).collect();
        assert_eq!(ys, vec![0.0, -15.0, 15.0]);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn nova_rays_are_evenly_spaced() {
        let (shots, events) = fire_once(ShipType::Gwiazdka, Side::Left, charged(4));
        assert_eq!(shots.len(), 8);
        for (i, shot) in shots.iter().enumerate() {
            let ProjectileKind::Nova { angle } = shot.kind else {
                panic!("expected a nova ray");
            };
            assert!((angle - i as f32 * PI / 4.0).abs() < 1e-6);
        }
        assert!(events.contains(&GameEvent::Nova {
            ship_type: ShipType::Gwiazdka
        }));
    }

    #[test]
    fn gwiazdka_tap_scatters() {
        let (shots, _) = fire_once(ShipType::Gwiazdka, Side::Left, TAP);
        let angles: Vec<f32> = shots
            .iter()
            .map(|p| match p.kind {
                ProjectileKind::Scatter { angle } => angle.to_degrees(),
                _ => f32::NAN,
            })
            .collect();
        assert_eq!(angles.len(), 3);
        assert!((angles[0] + 15.0).abs() < 1e-4);
        assert_eq!(angles[1], 0.0);
        assert!((angles[2] - 15.0).abs() < 1e-4);
    }

    #[test]
    fn nexus_cross_pattern() {
        let (shots, _) = fire_once(ShipType::Nexus, Side::Left, TAP);
        let ys: Vec<f32> = shots.iter().map(|p| p.y - 360.0).collect();
        assert_eq!(ys, vec![-10.0, 10.0]);

        let (shots, _) = fire_once(ShipType::Nexus, Side::Left, charged(8));
        assert_eq!(shots.len(), 4);
        let degs: Vec<f32> = shots
            .iter()
            .map(|p| match p.kind {
                ProjectileKind::Scatter { angle } => angle.to_degrees(),
                _ => f32::NAN,
            })
            .collect();
        for (got, want) in degs.iter().zip([-45.0f32, -15.0, 15.0, 45.0]) {
            assert!((got - want).abs() < 1e-3);
        }
    }
}
