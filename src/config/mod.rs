//! Configuration module - environment variable parsing

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::game::{MatchSettings, ShipType};
use crate::net::interpolation::DEFAULT_ALPHA;
use crate::net::{NetTuning, DEFAULT_PORT};

/// Which role this process plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetMode {
    /// Both combatants simulated here, no network
    Local,
    /// Authoritative simulation; combatant 2 comes from the client
    Host,
    /// Sends input and follows the host's snapshots
    Client,
}

impl FromStr for NetMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(NetMode::Local),
            "host" => Ok(NetMode::Host),
            "client" => Ok(NetMode::Client),
            _ => Err(ConfigError::Invalid("ARENA_MODE")),
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    pub mode: NetMode,
    /// Host listening address
    pub bind_addr: SocketAddr,
    /// Host to connect to in client mode
    pub host_addr: Option<SocketAddr>,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of human-readable ones
    pub log_json: bool,

    pub match_settings: MatchSettings,
    /// Seed for the autopilot input sources
    pub autopilot_seed: u64,
    /// Client-side positional smoothing factor
    pub interp_alpha: f32,
    pub net: NetTuning,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let mode = match env::var("ARENA_MODE") {
            Ok(v) => v.parse()?,
            Err(_) => NetMode::Local,
        };

        let port: u16 = parse_or("ARENA_PORT", DEFAULT_PORT)?;
        let bind_ip: IpAddr = parse_or("ARENA_BIND", IpAddr::from([0, 0, 0, 0]))?;

        let host_addr = match env::var("ARENA_HOST") {
            Ok(host) => Some(
                parse_host(&host, port).ok_or(ConfigError::InvalidAddress("ARENA_HOST"))?,
            ),
            Err(_) if mode == NetMode::Client => return Err(ConfigError::Missing("ARENA_HOST")),
            Err(_) => None,
        };

        let defaults = MatchSettings::default();
        let match_settings = MatchSettings {
            ship1: parse_or("P1_SHIP", ShipType::default())?,
            ship2: parse_or("P2_SHIP", ShipType::default())?,
            player1_name: env::var("P1_NAME").unwrap_or(defaults.player1_name),
            player2_name: env::var("P2_NAME").unwrap_or(defaults.player2_name),
        };

        let interp_alpha: f32 = parse_or("INTERP_ALPHA", DEFAULT_ALPHA)?;
        if !(0.0..=1.0).contains(&interp_alpha) {
            return Err(ConfigError::Invalid("INTERP_ALPHA"));
        }

        Ok(Self {
            mode,
            bind_addr: SocketAddr::new(bind_ip, port),
            host_addr,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")),
            match_settings,
            autopilot_seed: parse_or("AUTOPILOT_SEED", 0)?,
            interp_alpha,
            net: NetTuning::default(),
        })
    }
}

/// Parse an optional variable, falling back to `default` when unset
fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        Err(_) => Ok(default),
    }
}

/// Accepts `ip`, `ip:port` or a resolvable hostname
fn parse_host(host: &str, port: u16) -> Option<SocketAddr> {
    use std::net::ToSocketAddrs;

    let host = host.trim();
    if let Ok(addr) = host.parse::<SocketAddr>() {
        return Some(addr);
    }
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Some(SocketAddr::new(ip, port));
    }
    (host, port).to_socket_addrs().ok()?.next()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Invalid address in environment variable: {0}")]
    InvalidAddress(&'static str),
}
