//! Arena Duel - headless driver
//!
//! Runs the fixed-rate duel simulation in one of three roles:
//! - local: both ships on autopilot, no network
//! - host: authoritative simulation, ship 2 driven by a remote client
//! - client: sends autopilot input and follows the host's snapshots

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_duel::config::{Config, NetMode};
use arena_duel::game::{DuelMatch, GameEvent, NetworkSnapshot, Side};
use arena_duel::input::{Autopilot, InputSource};
use arena_duel::net::{NetworkClient, NetworkHost, PeerState};
use arena_duel::util::time::tick_duration;

/// How often the driver logs a status line
const REPORT_EVERY: u64 = 5 * 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_json);

    info!(mode = ?config.mode, "Starting Arena Duel");

    match config.mode {
        NetMode::Local => run_local(&config).await,
        NetMode::Host => run_host(&config).await?,
        NetMode::Client => run_client(&config).await?,
    }

    info!("Shutdown complete");
    Ok(())
}

/// Both ships on autopilot until one is destroyed
async fn run_local(config: &Config) {
    let mut game = DuelMatch::new(config.match_settings.clone());
    let mut pilot1 = Autopilot::new(config.autopilot_seed);
    let mut pilot2 = Autopilot::new(config.autopilot_seed.wrapping_add(1));

    let mut ticker = interval(tick_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    while !game.is_over() {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let events = game.step(&pilot1.poll(), &pilot2.poll());
                log_events(&events);
                report(&game);
            }
        }
    }

    log_result(&game);
}

/// Authoritative simulation; ship 2 follows the latest remote input
async fn run_host(config: &Config) -> anyhow::Result<()> {
    let host = NetworkHost::bind(config.bind_addr, config.net).await?;
    info!(addr = %host.local_addr(), "Waiting for a client");

    let mut game = DuelMatch::new(config.match_settings.clone());
    let mut pilot = Autopilot::new(config.autopilot_seed);

    let mut ticker = interval(tick_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                if game.is_over() {
                    // Keep serving the final state until stopped
                    host.publish(game.snapshot());
                    continue;
                }
                // Stale input is used as-is while no client is connected
                let remote = host.remote_input();
                let events = game.step(&pilot.poll(), &remote);
                host.publish(game.snapshot());
                log_events(&events);
                report(&game);
                if game.is_over() {
                    log_result(&game);
                }
            }
        }
    }

    host.stop().await;
    Ok(())
}

/// Send autopilot input and follow the smoothed host state
async fn run_client(config: &Config) -> anyhow::Result<()> {
    let addr = config
        .host_addr
        .ok_or_else(|| anyhow::anyhow!("client mode needs ARENA_HOST"))?;
    let mut client = NetworkClient::connect(addr, config.net, config.interp_alpha);
    info!(host = %client.host(), "Connecting to host");
    let mut pilot = Autopilot::new(config.autopilot_seed);

    let mut ticker = interval(tick_duration());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    let mut frame: u64 = 0;
    let mut last_state = PeerState::Disconnected;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                frame += 1;
                client.send_input(pilot.poll());

                let status = client.status();
                if status.state != last_state {
                    match &status.last_error {
                        Some(error) if status.state != PeerState::Connected => {
                            warn!(state = ?status.state, error = %error, "Link state changed");
                        }
                        _ => info!(state = ?status.state, "Link state changed"),
                    }
                    last_state = status.state;
                }

                let age = client
                    .latest_snapshot()
                    .map(|received| received.received_at.elapsed());
                if let Some(view) = client.render_step() {
                    if frame % REPORT_EVERY == 0 {
                        log_view(view, age.unwrap_or(Duration::ZERO));
                    }
                }
            }
        }
    }

    client.stop().await;
    Ok(())
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        debug!(event = event.name(), ship = ?event.ship_type(), "Game event");
    }
}

fn report(game: &DuelMatch) {
    if game.tick() % REPORT_EVERY != 0 {
        return;
    }
    let (s1, s2) = (game.ship(Side::Left), game.ship(Side::Right));
    info!(
        tick = game.tick(),
        ship1_health = s1.health,
        ship1_ammo = s1.ammo,
        ship2_health = s2.health,
        ship2_ammo = s2.ammo,
        projectiles = game.projectiles().len(),
        "Match status"
    );
}

fn log_result(game: &DuelMatch) {
    match game.winner() {
        Some(side) => info!(
            tick = game.tick(),
            winner = %game.player_name(side),
            loser = %game.player_name(side.opponent()),
            "Winner"
        ),
        None => info!(tick = game.tick(), "Match stopped without a winner"),
    }
}

fn log_view(view: &NetworkSnapshot, age: Duration) {
    info!(
        ship1_x = view.ship1.x,
        ship1_health = view.ship1.health,
        ship2_x = view.ship2.x,
        ship2_health = view.ship2.health,
        projectiles = view.bullets.len(),
        snapshot_age_ms = age.as_millis() as u64,
        "Remote view"
    );
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Panic");
    }));
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        }
    }
}
