//! Charge/tap resolution for the fire control
//!
//! Holding fire charges a shot; letting go before [`TAP_THRESHOLD`] steps
//! fires a cheap tap shot instead. Ammunition is only debited on release.

use super::entity::Combatant;
use super::profile::ShipType;
use super::{MAX_CHARGE_STEPS, TAP_THRESHOLD};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerState {
    #[default]
    Idle,
    Charging,
}

/// Per-combatant fire control state machine
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Trigger {
    state: TriggerState,
    charge_steps: u32,
    /// Fire control level seen on the previous step, for edge detection
    fire_held: bool,
}

impl Trigger {
    pub fn state(&self) -> TriggerState {
        self.state
    }

    pub fn is_charging(&self) -> bool {
        self.state == TriggerState::Charging
    }

    /// Steps the fire control has been held in the current charge
    pub fn charge_steps(&self) -> u32 {
        self.charge_steps
    }

    #[cfg(test)]
    pub(crate) fn force_charging(&mut self) {
        self.state = TriggerState::Charging;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Tap,
    Charged,
}

/// A resolved weapon release and the ammunition it cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseEvent {
    pub kind: ReleaseKind,
    pub cost: u32,
}

impl ReleaseEvent {
    pub fn is_charged(&self) -> bool {
        self.kind == ReleaseKind::Charged
    }

    /// Charge level carried by spawned projectiles, `None` for taps
    pub fn charge_level(&self) -> Option<u32> {
        match self.kind {
            ReleaseKind::Tap => None,
            ReleaseKind::Charged => Some(self.cost),
        }
    }
}

/// Result of feeding one step's fire control into the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Nothing,
    ChargeStarted,
    Released(ReleaseEvent),
}

/// Ammunition spent by a tap. Rekin fires a pair when it can.
pub fn tap_cost(ship_type: ShipType, ammo: u32) -> u32 {
    match (ship_type, ammo) {
        (_, 0) => 0,
        (ShipType::Rekin, a) if a >= 2 => 2,
        _ => 1,
    }
}

/// Ammunition spent by a charged release held for `charge_steps`.
///
/// Halves round to even, so a 1.5 ratio of a six-round magazine costs 2.
pub fn charged_cost(charge_steps: u32, max_ammo: u32, ammo: u32) -> u32 {
    let ratio = (charge_steps as f32 / MAX_CHARGE_STEPS as f32).min(1.0);
    let cost = ((ratio * max_ammo as f32).round_ties_even() as u32).max(1);
    cost.min(ammo)
}

impl Combatant {
    /// Start charging. No-op while already charging or with an empty magazine.
    pub fn press_fire(&mut self) -> bool {
        if self.trigger.is_charging() || self.ammo == 0 {
            return false;
        }
        self.trigger.state = TriggerState::Charging;
        self.trigger.charge_steps = 0;
        true
    }

    /// Resolve the held charge into a tap or charged release
    pub fn release_fire(&mut self) -> Option<ReleaseEvent> {
        if !self.trigger.is_charging() {
            return None;
        }
        self.trigger.state = TriggerState::Idle;

        let duration = self.trigger.charge_steps;
        let (kind, cost) = if duration < TAP_THRESHOLD {
            (ReleaseKind::Tap, tap_cost(self.ship_type, self.ammo))
        } else {
            (
                ReleaseKind::Charged,
                charged_cost(duration, self.max_ammo, self.ammo),
            )
        };
        if cost == 0 {
            return None;
        }

        self.ammo -= cost;
        Some(ReleaseEvent { kind, cost })
    }

    /// Count one step of charge
    pub fn update_charge(&mut self) {
        if self.trigger.is_charging() && self.trigger.charge_steps < MAX_CHARGE_STEPS {
            self.trigger.charge_steps += 1;
        }
    }

    /// Feed this step's fire level; press and release are detected on edges
    pub fn handle_fire(&mut self, fire: bool) -> FireOutcome {
        let was_held = self.trigger.fire_held;
        self.trigger.fire_held = fire;

        match (was_held, fire) {
            (false, true) if self.press_fire() => FireOutcome::ChargeStarted,
            (true, false) => self
                .release_fire()
                .map_or(FireOutcome::Nothing, FireOutcome::Released),
            _ => FireOutcome::Nothing,
        }
    }
}
