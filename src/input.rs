//! Control sources for the headless driver

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::game::ControlState;

/// Produces one combatant's five controls per step
pub trait InputSource: Send {
    fn poll(&mut self) -> ControlState;
}

/// Seeded random pilot: drifts vertically and alternates taps with charged shots
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: ChaCha8Rng,
    current: ControlState,
    /// Steps left before picking a new heading
    heading_steps: u32,
    /// Steps left holding or resting the fire control
    fire_steps: u32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            current: ControlState::IDLE,
            heading_steps: 0,
            fire_steps: 0,
        }
    }

    fn pick_heading(&mut self) {
        let vertical = self.rng.gen_range(0..3);
        let horizontal = self.rng.gen_range(0..3);
        self.current.up = vertical == 1;
        self.current.down = vertical == 2;
        self.current.left = horizontal == 1;
        self.current.right = horizontal == 2;
        self.heading_steps = self.rng.gen_range(20..90);
    }

    fn toggle_fire(&mut self) {
        self.current.fire = !self.current.fire;
        self.fire_steps = if self.current.fire {
            // Mostly taps, sometimes a full charge
            if self.rng.gen_bool(0.6) {
                self.rng.gen_range(1..6)
            } else {
                self.rng.gen_range(10..70)
            }
        } else {
            self.rng.gen_range(5..40)
        };
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self) -> ControlState {
        if self.heading_steps == 0 {
            self.pick_heading();
        }
        if self.fire_steps == 0 {
            self.toggle_fire();
        }
        self.heading_steps -= 1;
        self.fire_steps -= 1;
        self.current
    }
}
