//! LAN replication: host-authoritative TCP link carrying newline-delimited JSON

pub mod backoff;
pub mod client;
pub mod codec;
pub mod host;
pub mod interpolation;
pub mod protocol;

pub use client::NetworkClient;
pub use host::NetworkHost;
pub use protocol::WireMessage;

use std::io;
use std::time::Duration;

use crate::util::rate_limit::INPUT_RATE_LIMIT;

/// Default TCP port for the duel link
pub const DEFAULT_PORT: u16 = 50007;

/// Network errors
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("operation timed out")]
    Timeout,

    #[error("connection closed by peer")]
    Closed,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

impl NetError {
    /// Whether the link can recover by reconnecting or re-listening
    pub fn is_transient(&self) -> bool {
        match self {
            NetError::Timeout | NetError::Closed => true,
            NetError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::TimedOut
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::Interrupted
            ),
            NetError::Encode(_) => false,
        }
    }
}

impl From<tokio::time::error::Elapsed> for NetError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        NetError::Timeout
    }
}

/// Connection lifecycle as seen by either peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Host bound, accept loop starting
    Listening,
    /// Host waiting for a client
    Idle,
    Connecting,
    Connected,
    /// Client between attempts
    Disconnected,
    Stopped,
}

/// Read-only status exposed to the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionStatus {
    pub state: PeerState,
    pub last_error: Option<String>,
}

impl ConnectionStatus {
    pub fn new(state: PeerState) -> Self {
        Self {
            state,
            last_error: None,
        }
    }

    pub fn failed(state: PeerState, error: &NetError) -> Self {
        Self {
            state,
            last_error: Some(error.to_string()),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.state == PeerState::Connected
    }
}

/// Timings for the host and client loops
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetTuning {
    /// Host accept poll
    pub accept_poll: Duration,
    /// Host snapshot cadence
    pub send_interval: Duration,
    pub connect_timeout: Duration,
    /// Client steady-state read timeout
    pub read_timeout: Duration,
    /// Client loop sleep between iterations
    pub client_poll: Duration,
    pub backoff_base: Duration,
    pub backoff_max: Duration,
    /// Inbound input records allowed per second
    pub input_rate_limit: u32,
}

impl Default for NetTuning {
    fn default() -> Self {
        Self {
            accept_poll: Duration::from_secs(1),
            send_interval: Duration::from_millis(50),
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_millis(500),
            client_poll: Duration::from_millis(50),
            backoff_base: Duration::from_secs(1),
            backoff_max: Duration::from_secs(8),
            input_rate_limit: INPUT_RATE_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_resets_are_transient() {
        let reset = NetError::from(io::Error::from(io::ErrorKind::ConnectionReset));
        assert!(reset.is_transient());
        assert!(NetError::Timeout.is_transient());

        let denied = NetError::from(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!denied.is_transient());
    }

    #[test]
    fn status_carries_last_error() {
        let status = ConnectionStatus::failed(PeerState::Disconnected, &NetError::Closed);
        assert!(!status.is_connected());
        assert_eq!(status.last_error.as_deref(), Some("connection closed by peer"));
    }
}
