//! Per-ship weapon and movement profiles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::weapon::{
    BeamEmitter, BoomerangLauncher, CrossFire, MineLayer, RapidFan, SingleShot, StarBurst,
    TwinSpread, Weapon,
};

/// Ship types available in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipType {
    /// Square hull, single heavy block shot
    Zaba,
    /// Fast triangle, twin and triple spread
    Rekin,
    /// Rapid-fire circle, wide charged fan
    Osa,
    /// Kite with a charged instant beam
    Komar,
    /// Hexagonal mine-layer
    Kombuz,
    /// Star with scatter shot and nova burst
    Gwiazdka,
    /// Boomerang thrower
    Rift,
    /// X-shaped ship with cross pattern
    Nexus,
}

impl ShipType {
    pub const ALL: [ShipType; 8] = [
        ShipType::Zaba,
        ShipType::Rekin,
        ShipType::Osa,
        ShipType::Komar,
        ShipType::Kombuz,
        ShipType::Gwiazdka,
        ShipType::Rift,
        ShipType::Nexus,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ShipType::Zaba => "Zaba",
            ShipType::Rekin => "Rekin",
            ShipType::Osa => "Osa",
            ShipType::Komar => "Komar",
            ShipType::Kombuz => "Kombuz",
            ShipType::Gwiazdka => "Gwiazdka",
            ShipType::Rift => "Rift",
            ShipType::Nexus => "Nexus",
        }
    }

    /// Static profile for this ship type
    pub fn profile(self) -> &'static WeaponProfile {
        WeaponProfile::for_type(self)
    }
}

impl Default for ShipType {
    fn default() -> Self {
        Self::Zaba
    }
}

impl fmt::Display for ShipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown ship type: {0}")]
pub struct UnknownShipType(pub String);

impl FromStr for ShipType {
    type Err = UnknownShipType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipType::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownShipType(s.to_string()))
    }
}

/// Weapon strategy and its parameters, one shape per ship type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Armament {
    Single(SingleShot),
    TwinSpread(TwinSpread),
    RapidFan(RapidFan),
    Beam(BeamEmitter),
    MineLayer(MineLayer),
    Boomerang(BoomerangLauncher),
    StarBurst(StarBurst),
    CrossFire(CrossFire),
}

impl Armament {
    /// Strategy object that turns releases into projectiles
    pub fn weapon(&self) -> &dyn Weapon {
        match self {
            Armament::Single(w) => w,
            Armament::TwinSpread(w) => w,
            Armament::RapidFan(w) => w,
            Armament::Beam(w) => w,
            Armament::MineLayer(w) => w,
            Armament::Boomerang(w) => w,
            Armament::StarBurst(w) => w,
            Armament::CrossFire(w) => w,
        }
    }
}

/// Immutable per-type configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponProfile {
    pub ship_type: ShipType,
    pub health: i32,
    pub max_ammo: u32,

    // Movement
    pub speed: f32,
    // Tuning data carried by the table but not read by the simulation:
    // movement is constant-speed, projectile sizes follow BULLET_SIZE and the
    // charge counter advances one per step.
    pub acceleration: f32,
    pub deceleration: f32,

    // Base projectile
    pub bullet_size: f32,
    pub bullet_speed: f32,
    pub bullet_damage: f32,
    /// Steps between ammunition refills
    pub recharge_time: u32,

    // Charged projectile
    pub charged_bullet_speed: f32,
    pub charged_bullet_size: f32,
    pub charged_damage_multiplier: f32,
    pub charge_rate: f32,

    pub armament: Armament,
}

static PROFILES: [WeaponProfile; 8] = [
    WeaponProfile {
        ship_type: ShipType::Zaba,
        health: 7,
        max_ammo: 6,
        speed: 3.0,
        acceleration: 0.5,
        deceleration: 0.3,
        bullet_size: 6.0,
        bullet_speed: 5.0,
        bullet_damage: 1.0,
        recharge_time: 20,
        charged_bullet_speed: 7.0,
        charged_bullet_size: 12.0,
        charged_damage_multiplier: 2.0,
        charge_rate: 1.0,
        armament: Armament::Single(SingleShot),
    },
    WeaponProfile {
        ship_type: ShipType::Rekin,
        health: 6,
        max_ammo: 6,
        speed: 5.0,
        acceleration: 0.8,
        deceleration: 0.4,
        bullet_size: 5.0,
        bullet_speed: 6.0,
        bullet_damage: 1.0,
        recharge_time: 25,
        charged_bullet_speed: 8.0,
        charged_bullet_size: 10.0,
        charged_damage_multiplier: 1.5,
        charge_rate: 1.2,
        armament: Armament::TwinSpread(TwinSpread {
            tap_offset: 8.0,
            charged_spacing: 12.0,
            charged_max: 3,
        }),
    },
    WeaponProfile {
        ship_type: ShipType::Osa,
        health: 5,
        max_ammo: 16,
        speed: 4.0,
        acceleration: 0.6,
        deceleration: 0.3,
        bullet_size: 4.0,
        bullet_speed: 7.0,
        bullet_damage: 0.5,
        recharge_time: 15,
        charged_bullet_speed: 12.0,
        charged_bullet_size: 8.0,
        charged_damage_multiplier: 1.5,
        charge_rate: 1.5,
        armament: Armament::RapidFan(RapidFan {
            max_spawn: 7,
            spacing: 8.0,
        }),
    },
    WeaponProfile {
        ship_type: ShipType::Komar,
        health: 5,
        max_ammo: 4,
        speed: 4.0,
        acceleration: 0.5,
        deceleration: 0.3,
        bullet_size: 4.0,
        bullet_speed: 8.0,
        bullet_damage: 1.0,
        recharge_time: 30,
        charged_bullet_speed: 6.0,
        charged_bullet_size: 8.0,
        charged_damage_multiplier: 2.0,
        charge_rate: 0.8,
        armament: Armament::Beam(BeamEmitter { display_steps: 15 }),
    },
    WeaponProfile {
        ship_type: ShipType::Kombuz,
        health: 7,
        max_ammo: 6,
        speed: 3.0,
        acceleration: 0.4,
        deceleration: 0.2,
        bullet_size: 8.0,
        bullet_speed: 4.0,
        bullet_damage: 1.0,
        recharge_time: 40,
        charged_bullet_speed: 5.0,
        charged_bullet_size: 12.0,
        charged_damage_multiplier: 2.0,
        charge_rate: 0.7,
        armament: Armament::MineLayer(MineLayer {
            travel_fraction: 0.60,
            explosion_delay: 3 * 60,
            charged_explosion_delay: 4 * 60,
            explosion_steps: 30,
            radius_growth: 4.0,
        }),
    },
    WeaponProfile {
        ship_type: ShipType::Gwiazdka,
        health: 6,
        max_ammo: 8,
        speed: 4.0,
        acceleration: 0.6,
        deceleration: 0.3,
        bullet_size: 5.0,
        bullet_speed: 6.0,
        bullet_damage: 0.75,
        recharge_time: 25,
        charged_bullet_speed: 8.0,
        charged_bullet_size: 8.0,
        charged_damage_multiplier: 1.5,
        charge_rate: 1.0,
        armament: Armament::StarBurst(StarBurst {
            scatter_angle_deg: 30.0,
            nova_rays: 8,
        }),
    },
    WeaponProfile {
        ship_type: ShipType::Rift,
        health: 5,
        max_ammo: 8,
        speed: 4.0,
        acceleration: 0.6,
        deceleration: 0.3,
        bullet_size: 8.0,
        bullet_speed: 6.0,
        bullet_damage: 1.0,
        recharge_time: 25,
        charged_bullet_speed: 8.0,
        charged_bullet_size: 12.0,
        charged_damage_multiplier: 1.5,
        charge_rate: 1.2,
        armament: Armament::Boomerang(BoomerangLauncher {
            tap_offset: 15.0,
            sweep_angle_deg: 120.0,
            max_sweep: 5,
            return_distance: 300.0,
            return_speed: 4.0,
            return_damage: 1.5,
        }),
    },
    WeaponProfile {
        ship_type: ShipType::Nexus,
        health: 6,
        max_ammo: 8,
        speed: 4.0,
        acceleration: 0.5,
        deceleration: 0.3,
        bullet_size: 6.0,
        bullet_speed: 6.0,
        bullet_damage: 1.0,
        recharge_time: 25,
        charged_bullet_speed: 7.0,
        charged_bullet_size: 10.0,
        charged_damage_multiplier: 2.0,
        charge_rate: 1.0,
        armament: Armament::CrossFire(CrossFire {
            dual_spacing: 20.0,
            cross_size: 4,
            cross_spread_deg: 30.0,
        }),
    },
];

impl WeaponProfile {
    pub fn for_type(ship_type: ShipType) -> &'static WeaponProfile {
        let idx = match ship_type {
            ShipType::Zaba => 0,
            ShipType::Rekin => 1,
            ShipType::Osa => 2,
            ShipType::Komar => 3,
            ShipType::Kombuz => 4,
            ShipType::Gwiazdka => 5,
            ShipType::Rift => 6,
            ShipType::Nexus => 7,
        };
        &PROFILES[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_keyed_by_type() {
        for ship in ShipType::ALL {
            assert_eq!(WeaponProfile::for_type(ship).ship_type, ship);
        }
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!("gwiazdka".parse::<ShipType>(), Ok(ShipType::Gwiazdka));
        assert_eq!(" Rift ".parse::<ShipType>(), Ok(ShipType::Rift));
        assert!("Falcon".parse::<ShipType>().is_err());
    }

    #[test]
    fn serializes_as_plain_name() {
        let json = serde_json::to_string(&ShipType::Kombuz).unwrap();
        assert_eq!(json, "\"Kombuz\"");
    }
}
