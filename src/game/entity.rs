//! Runtime entities: combatants and projectiles

use super::charge::Trigger;
use super::profile::{ShipType, WeaponProfile};
use super::{
    ControlState, ARENA_HEIGHT, ARENA_WIDTH, BULLET_SIZE, BULLET_SPEED_MULT, EDGE_MARGIN,
    KNOCKBACK, SHIP_SIZE,
};

/// Steps a hit tilt stays visible
const TILT_STEPS: u32 = 18;
/// Tilt applied on hit, in pixels of vertical offset
const TILT_AMOUNT: f32 = 8.0;
const TILT_DECAY: f32 = 0.85;

/// Which half of the arena a combatant owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Combatant 1, fires toward +x
    Left,
    /// Combatant 2, fires toward -x
    Right,
}

impl Side {
    /// Positive movement/fire direction for this side
    pub fn direction(self) -> i32 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }

    pub fn opponent(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Side targeted by a projectile travelling in `direction`
    pub fn targeted_by(direction: i32) -> Side {
        if direction > 0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn from_center(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x - width / 2.0, y - height / 2.0, width, height)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Strict overlap; touching edges do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }
}

/// A ship taking part in the duel
#[derive(Debug, Clone)]
pub struct Combatant {
    pub ship_type: ShipType,
    pub side: Side,

    // Position
    pub x: f32,
    pub y: f32,

    // Combat
    pub health: i32,
    pub max_health: i32,
    pub ammo: u32,
    pub max_ammo: u32,
    /// Steps until the next ammunition refill may happen
    pub recharge_cooldown: u32,
    pub trigger: Trigger,

    // Cosmetic hit feedback
    pub tilt: f32,
    pub tilt_timer: u32,
}

impl Combatant {
    pub fn new(ship_type: ShipType, side: Side, x: f32, y: f32) -> Self {
        let profile = ship_type.profile();
        Self {
            ship_type,
            side,
            x,
            y,
            health: profile.health,
            max_health: profile.health,
            ammo: profile.max_ammo,
            max_ammo: profile.max_ammo,
            recharge_cooldown: 0,
            trigger: Trigger::default(),
            tilt: 0.0,
            tilt_timer: 0,
        }
    }

    /// Spawn at the standard start position for `side`
    pub fn spawn(ship_type: ShipType, side: Side) -> Self {
        let x = match side {
            Side::Left => 100.0,
            Side::Right => ARENA_WIDTH - 100.0,
        };
        Self::new(ship_type, side, x, ARENA_HEIGHT / 2.0)
    }

    pub fn profile(&self) -> &'static WeaponProfile {
        self.ship_type.profile()
    }

    pub fn direction(&self) -> i32 {
        self.side.direction()
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.x, self.y, SHIP_SIZE, SHIP_SIZE)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_charging(&self) -> bool {
        self.trigger.is_charging()
    }

    /// Apply one unit of damage, returns true if the ship died
    pub fn take_damage(&mut self) -> bool {
        self.health = (self.health - 1).max(0);
        self.health == 0
    }

    /// Push the ship away from the attacker and start a tilt
    pub fn knock_back(&mut self) {
        // Pushed toward its own back wall
        self.x -= KNOCKBACK * self.direction() as f32;
        self.tilt = -TILT_AMOUNT * self.direction() as f32;
        self.tilt_timer = TILT_STEPS;
    }

    pub fn decay_tilt(&mut self) {
        if self.tilt_timer == 0 {
            return;
        }
        self.tilt_timer -= 1;
        self.tilt = (self.tilt * TILT_DECAY).trunc();
        if self.tilt.abs() < 1.0 {
            self.tilt = 0.0;
        }
    }

    /// Move within this side's half of the arena
    pub fn apply_movement(&mut self, input: &ControlState) {
        let speed = self.profile().speed;
        let half = ARENA_WIDTH / 2.0;
        let (min_x, max_x) = match self.side {
            Side::Left => (EDGE_MARGIN, half - EDGE_MARGIN),
            Side::Right => (half + EDGE_MARGIN, ARENA_WIDTH - EDGE_MARGIN),
        };

        if input.up && self.y > EDGE_MARGIN {
            self.y -= speed;
        }
        if input.down && self.y < ARENA_HEIGHT - EDGE_MARGIN {
            self.y += speed;
        }
        if input.left && self.x > min_x {
            self.x -= speed;
        }
        if input.right && self.x < max_x {
            self.x += speed;
        }
    }

    /// Advance the ammunition refill countdown; paused while charging
    pub fn recharge_tick(&mut self) {
        if self.recharge_cooldown > 0 {
            self.recharge_cooldown -= 1;
        } else if self.ammo < self.max_ammo && !self.is_charging() {
            self.ammo += 1;
            self.recharge_cooldown = self.profile().recharge_time;
        }
    }
}

/// Beam variant state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamState {
    /// Steps the beam stays on screen
    pub display_steps: u32,
    pub damage_applied: bool,
}

/// Mine variant state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineState {
    /// X coordinate past which the mine stops and arms
    pub settle_x: f32,
    /// Age at which the explosion begins
    pub fuse: u32,
    pub explosion_steps: u32,
    pub radius_growth: f32,
    pub settled: bool,
    pub exploding: bool,
    /// Steps since the explosion began
    pub explosion_timer: u32,
    /// Blast damage is applied once, on the first exploding step
    pub explosion_applied: bool,
}

impl MineState {
    pub fn radius(&self) -> f32 {
        self.explosion_timer as f32 * self.radius_growth
    }
}

/// Boomerang variant state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoomerangState {
    /// Arc angle for charged sweep shots
    pub angle: Option<f32>,
    pub return_distance: f32,
    pub return_speed: f32,
    pub return_damage: f32,
    pub distance_traveled: f32,
    pub is_returning: bool,
}

/// Behavior variant of a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    Straight,
    Beam(BeamState),
    Mine(MineState),
    Boomerang(BoomerangState),
    Nova { angle: f32 },
    Scatter { angle: f32 },
}

/// A live projectile
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub direction: i32,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub damage: f32,
    pub owner: ShipType,
    pub is_charged: bool,
    pub charge_level: u32,
    /// Steps since spawn
    pub age: u32,
    pub kind: ProjectileKind,
}

impl Projectile {
    /// Build a projectile sized and tuned from the owner's profile.
    ///
    /// `charge_level` is `None` for tap shots and the ammunition spent for charged ones.
    pub fn new(
        owner: ShipType,
        x: f32,
        y: f32,
        direction: i32,
        charge_level: Option<u32>,
        kind: ProjectileKind,
    ) -> Self {
        let profile = owner.profile();
        let base = BULLET_SIZE * 2.0;
        let is_charged = charge_level.is_some();
        let level = charge_level.unwrap_or(1);
        let extra = level.saturating_sub(1) as f32;

        let (speed, damage) = if is_charged {
            (
                profile.charged_bullet_speed,
                profile.bullet_damage * profile.charged_damage_multiplier,
            )
        } else {
            (profile.bullet_speed, profile.bullet_damage)
        };

        let (width, height) = match (owner, is_charged) {
            (ShipType::Komar, true) => (
                base + extra * BULLET_SIZE,
                (base + extra * BULLET_SIZE * 4.0).min(200.0),
            ),
            (ShipType::Komar, false) => (base, 30.0),
            (_, true) => (base + extra * BULLET_SIZE, base + extra * BULLET_SIZE),
            (_, false) => (base, base),
        };

        Self {
            x,
            y,
            direction,
            speed: speed * BULLET_SPEED_MULT,
            width,
            height,
            damage,
            owner,
            is_charged,
            charge_level: level,
            age: 0,
            kind,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.x, self.y, self.width, self.height)
    }

    pub fn is_beam(&self) -> bool {
        matches!(self.kind, ProjectileKind::Beam(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_is_confined_to_own_half() {
        let mut ship = Combatant::new(ShipType::Rekin, Side::Left, ARENA_WIDTH / 2.0 - 51.0, 300.0);
        let right = ControlState {
            right: true,
            ..ControlState::IDLE
        };
        ship.apply_movement(&right);
        assert_eq!(ship.x, ARENA_WIDTH / 2.0 - 46.0);
        // Past the limit, further input does nothing
        ship.apply_movement(&right);
        assert_eq!(ship.x, ARENA_WIDTH / 2.0 - 46.0);
    }

    #[test]
    fn recharge_waits_for_cooldown_and_pauses_while_charging() {
        let mut ship = Combatant::spawn(ShipType::Zaba, Side::Left);
        ship.ammo = 2;
        ship.recharge_tick();
        assert_eq!(ship.ammo, 3);
        assert_eq!(ship.recharge_cooldown, 20);

        for _ in 0..20 {
            ship.recharge_tick();
        }
        assert_eq!(ship.ammo, 3);

        ship.trigger.force_charging();
        ship.recharge_tick();
        assert_eq!(ship.ammo, 3, "no refill while charging");
    }

    #[test]
    fn damage_never_drops_below_zero() {
        let mut ship = Combatant::spawn(ShipType::Osa, Side::Right);
        ship.health = 1;
        assert!(ship.take_damage());
        assert!(ship.take_damage());
        assert_eq!(ship.health, 0);
    }

    #[test]
    fn knockback_pushes_away_from_attacker_and_tilt_decays() {
        let mut ship = Combatant::spawn(ShipType::Zaba, Side::Right);
        let start = ship.x;
        ship.knock_back();
        assert_eq!(ship.x, start + KNOCKBACK);
        assert_eq!(ship.tilt, 8.0);

        for _ in 0..TILT_STEPS {
            ship.decay_tilt();
        }
        assert_eq!(ship.tilt, 0.0);
        assert_eq!(ship.tilt_timer, 0);
    }

    #[test]
    fn charged_sizes_grow_with_level() {
        let p = Projectile::new(ShipType::Zaba, 0.0, 0.0, 1, Some(3), ProjectileKind::Straight);
        assert_eq!((p.width, p.height), (24.0, 24.0));
        assert_eq!(p.speed, 7.0 * BULLET_SPEED_MULT);

        let beam = Projectile::new(
            ShipType::Komar,
            0.0,
            0.0,
            1,
            Some(4),
            ProjectileKind::Beam(BeamState {
                display_steps: 15,
                damage_applied: false,
            }),
        );
        assert_eq!(beam.height, 84.0);

        let line = Projectile::new(ShipType::Komar, 0.0, 0.0, 1, None, ProjectileKind::Straight);
        assert_eq!((line.width, line.height), (12.0, 30.0));
    }

    #[test]
    fn rects_touching_at_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&b));
        let c = Rect::new(9.5, 5.0, 10.0, 10.0);
        assert!(a.overlaps(&c));
    }
}
