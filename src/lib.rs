//! Two-ship arena duel: deterministic combat simulation with
//! host-authoritative LAN replication.

pub mod config;
pub mod game;
pub mod input;
pub mod net;
pub mod util;
