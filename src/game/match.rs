//! Match state and the deterministic per-step simulation

use tracing::{debug, info};

use super::charge::FireOutcome;
use super::combat::CombatSystem;
use super::entity::{Combatant, Projectile, Side};
use super::events::GameEvent;
use super::profile::ShipType;
use super::snapshot::NetworkSnapshot;
use super::{behavior, weapon, ControlState};

/// Match phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Both ships alive
    Playing,
    /// A ship was destroyed
    Ended,
}

/// Who flies what
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    pub ship1: ShipType,
    pub ship2: ShipType,
    pub player1_name: String,
    pub player2_name: String,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            ship1: ShipType::default(),
            ship2: ShipType::default(),
            player1_name: "Player 1".to_string(),
            player2_name: "Player 2".to_string(),
        }
    }
}

/// Authoritative duel state
#[derive(Debug, Clone)]
pub struct DuelMatch {
    /// Combatant 1 (left) and combatant 2 (right)
    ships: [Combatant; 2],
    projectiles: Vec<Projectile>,
    phase: MatchPhase,
    winner: Option<Side>,
    names: [String; 2],
    tick: u64,
}

impl DuelMatch {
    pub fn new(settings: MatchSettings) -> Self {
        info!(
            ship1 = %settings.ship1,
            ship2 = %settings.ship2,
            "Match started"
        );
        Self {
            ships: [
                Combatant::spawn(settings.ship1, Side::Left),
                Combatant::spawn(settings.ship2, Side::Right),
            ],
            projectiles: Vec::new(),
            phase: MatchPhase::Playing,
            winner: None,
            names: [settings.player1_name, settings.player2_name],
            tick: 0,
        }
    }

    pub fn ship(&self, side: Side) -> &Combatant {
        &self.ships[side.index()]
    }

    pub fn ship_mut(&mut self, side: Side) -> &mut Combatant {
        &mut self.ships[side.index()]
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner.map(|side| self.names[side.index()].as_str())
    }

    pub fn player_name(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Authoritative snapshot for replication
    pub fn snapshot(&self) -> NetworkSnapshot {
        NetworkSnapshot::capture(&self.ships, &self.projectiles)
    }

    /// Advance the simulation by one step.
    ///
    /// Order: fire intake, movement and recharge, charge counters, projectile
    /// advance and collision, cosmetic decay, then deferred removal.
    /// Once the match has ended the state is frozen.
    pub fn step(&mut self, p1: &ControlState, p2: &ControlState) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.is_over() {
            return events;
        }
        self.tick += 1;

        self.process_inputs([p1, p2], &mut events);
        self.update_projectiles(&mut events);

        for ship in &mut self.ships {
            ship.decay_tilt();
        }

        events
    }

    fn process_inputs(&mut self, inputs: [&ControlState; 2], events: &mut Vec<GameEvent>) {
        for (ship, input) in self.ships.iter_mut().zip(inputs) {
            match ship.handle_fire(input.fire) {
                FireOutcome::Nothing => {}
                FireOutcome::ChargeStarted => events.push(GameEvent::Charge {
                    ship_type: ship.ship_type,
                    side: ship.side,
                }),
                FireOutcome::Released(release) => {
                    let volley = weapon::fire(ship, &release, events);
                    debug!(
                        ship = %ship.ship_type,
                        charged = release.is_charged(),
                        cost = release.cost,
                        projectiles = volley.len(),
                        "Weapon released"
                    );
                    self.projectiles.extend(volley);
                }
            }
        }

        for (ship, input) in self.ships.iter_mut().zip(inputs) {
            ship.apply_movement(input);
            ship.recharge_tick();
        }

        for ship in &mut self.ships {
            ship.update_charge();
        }
    }

    fn update_projectiles(&mut self, events: &mut Vec<GameEvent>) {
        let mut expired: Vec<usize> = Vec::new();

        for (idx, projectile) in self.projectiles.iter_mut().enumerate() {
            if behavior::advance(projectile, events) {
                expired.push(idx);
                continue;
            }
            // Damage after the deciding hit is ignored
            if self.phase == MatchPhase::Ended {
                continue;
            }

            let hit = CombatSystem::resolve(projectile, &mut self.ships, events);
            if hit.consumed {
                expired.push(idx);
            }
            if let Some(victim) = hit.killed {
                let winner = victim.opponent();
                self.phase = MatchPhase::Ended;
                self.winner = Some(winner);
                info!(
                    tick = self.tick,
                    winner = %self.names[winner.index()],
                    "Match ended"
                );
            }
        }

        // Remove in reverse order to keep indices valid
        for idx in expired.into_iter().rev() {
            self.projectiles.remove(idx);
        }
    }
}
