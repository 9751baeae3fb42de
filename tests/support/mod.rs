// Shared helpers for the link integration tests.
use std::{net::SocketAddr, time::Duration};

use arena_duel::game::{DuelMatch, MatchSettings, NetworkSnapshot};
use arena_duel::net::NetTuning;

// Short timings so reconnects and cadences play out in milliseconds.
pub fn fast_tuning() -> NetTuning {
    NetTuning {
        accept_poll: Duration::from_millis(20),
        send_interval: Duration::from_millis(10),
        connect_timeout: Duration::from_millis(500),
        read_timeout: Duration::from_millis(20),
        client_poll: Duration::from_millis(5),
        backoff_base: Duration::from_millis(20),
        backoff_max: Duration::from_millis(80),
        ..NetTuning::default()
    }
}

// Ephemeral loopback address; the OS picks the port.
pub fn loopback() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 0))
}

// Opening state of a default duel.
pub fn opening_snapshot() -> NetworkSnapshot {
    DuelMatch::new(MatchSettings::default()).snapshot()
}

// Poll `check` until it holds or the deadline passes.
pub async fn wait_until<F>(what: &str, mut check: F)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {what}");
}
