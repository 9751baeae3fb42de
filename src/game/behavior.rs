//! Per-variant projectile motion and lifetime

use super::entity::{BoomerangState, MineState, Projectile, ProjectileKind};
use super::events::GameEvent;
use super::{ARENA_HEIGHT, ARENA_WIDTH, EXIT_MARGIN};

/// Advance a projectile by one step. Returns true once it has expired.
pub fn advance(projectile: &mut Projectile, events: &mut Vec<GameEvent>) -> bool {
    let mut kind = projectile.kind;

    let expired = match &mut kind {
        ProjectileKind::Straight => {
            projectile.x += projectile.direction as f32 * projectile.speed;
            false
        }
        ProjectileKind::Beam(beam) => projectile.age >= beam.display_steps,
        ProjectileKind::Mine(mine) => step_mine(projectile, mine, events),
        ProjectileKind::Boomerang(state) => {
            step_boomerang(projectile, state);
            false
        }
        ProjectileKind::Nova { angle } | ProjectileKind::Scatter { angle } => {
            let dir = projectile.direction as f32;
            projectile.x += projectile.speed * dir * angle.cos();
            projectile.y += projectile.speed * dir * angle.sin();
            false
        }
    };

    projectile.kind = kind;
    projectile.age += 1;
    expired || out_of_bounds(projectile)
}

fn out_of_bounds(p: &Projectile) -> bool {
    p.x < -EXIT_MARGIN
        || p.x > ARENA_WIDTH + EXIT_MARGIN
        || p.y < -EXIT_MARGIN
        || p.y > ARENA_HEIGHT + EXIT_MARGIN
}

fn step_mine(p: &mut Projectile, mine: &mut MineState, events: &mut Vec<GameEvent>) -> bool {
    if !mine.settled {
        p.x += p.direction as f32 * p.speed;
        let crossed = if p.direction > 0 {
            p.x > mine.settle_x
        } else {
            p.x < mine.settle_x
        };
        if crossed {
            mine.settled = true;
            p.speed = 0.0;
            events.push(GameEvent::MineArm { x: p.x, y: p.y });
        }
    }

    if !mine.exploding && p.age > mine.fuse {
        mine.exploding = true;
        events.push(GameEvent::MineExplode { x: p.x, y: p.y });
    }

    if mine.exploding {
        mine.explosion_timer += 1;
        if mine.explosion_timer > mine.explosion_steps {
            return true;
        }
    }
    false
}

fn step_boomerang(p: &mut Projectile, state: &mut BoomerangState) {
    let dir = p.direction as f32;
    match state.angle {
        Some(angle) => {
            p.x += p.speed * dir * angle.cos();
            p.y += p.speed * dir * angle.sin();
        }
        None => p.x += p.speed * dir,
    }
    state.distance_traveled += p.speed;

    if !state.is_returning && state.distance_traveled > state.return_distance {
        state.is_returning = true;
        p.direction = -p.direction;
        p.speed = state.return_speed;
        p.damage *= state.return_damage;
    }
}
