//! Client side of the duel link
//!
//! Streams local input to the host, keeps the latest authoritative snapshot,
//! and reconnects with exponential backoff until stopped.

use std::net::SocketAddr;
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

use crate::game::{ControlState, NetworkSnapshot};

use super::backoff::Backoff;
use super::codec::LineBuffer;
use super::interpolation::SnapshotInterpolator;
use super::protocol::{decode_line, encode_line, ProtocolError, WireMessage};
use super::{ConnectionStatus, NetError, NetTuning, PeerState};

/// Latest authoritative state and when it arrived
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivedSnapshot {
    pub snapshot: NetworkSnapshot,
    pub received_at: Instant,
}

/// Background task ends of the client's single-slot channels
struct ClientLink {
    input: watch::Receiver<Option<ControlState>>,
    snapshot: watch::Sender<Option<ReceivedSnapshot>>,
    status: watch::Sender<ConnectionStatus>,
}

/// Connection to a remote host
pub struct NetworkClient {
    host: SocketAddr,
    local_input: watch::Sender<Option<ControlState>>,
    snapshot: watch::Receiver<Option<ReceivedSnapshot>>,
    status: watch::Receiver<ConnectionStatus>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    interpolator: SnapshotInterpolator,
}

impl NetworkClient {
    /// Start connecting to `host` in the background. Must be called within a Tokio runtime.
    pub fn connect(host: SocketAddr, tuning: NetTuning, alpha: f32) -> Self {
        let (local_input, input_rx) = watch::channel(None);
        let (snapshot_tx, snapshot) = watch::channel(None);
        let (status_tx, status) = watch::channel(ConnectionStatus::new(PeerState::Disconnected));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let link = ClientLink {
            input: input_rx,
            snapshot: snapshot_tx,
            status: status_tx,
        };
        let task = tokio::spawn(connect_loop(host, tuning, link, shutdown_rx));

        Self {
            host,
            local_input,
            snapshot,
            status,
            shutdown,
            task: Some(task),
            interpolator: SnapshotInterpolator::new(alpha),
        }
    }

    pub fn host(&self) -> SocketAddr {
        self.host
    }

    /// Replace the input sent on the next loop iteration
    pub fn send_input(&self, input: ControlState) {
        self.local_input.send_replace(Some(input));
    }

    pub fn latest_snapshot(&self) -> Option<ReceivedSnapshot> {
        self.snapshot.borrow().clone()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Advance the smoothed view one render step toward the latest snapshot
    pub fn render_step(&mut self) -> Option<&NetworkSnapshot> {
        let target = self
            .snapshot
            .borrow()
            .as_ref()
            .map(|received| received.snapshot.clone())?;
        Some(self.interpolator.step(&target))
    }

    /// Stop reconnecting, close the socket and wait for the task to finish
    pub async fn stop(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Client task failed");
            }
        }
    }
}

impl Drop for NetworkClient {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn connect_loop(
    host: SocketAddr,
    tuning: NetTuning,
    link: ClientLink,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut backoff = Backoff::new(tuning.backoff_base, tuning.backoff_max);
    let mut last_error: Option<String> = None;

    loop {
        if *shutdown.borrow() {
            break;
        }

        link.status.send_replace(ConnectionStatus {
            state: PeerState::Connecting,
            last_error: last_error.clone(),
        });

        let connected = tokio::select! {
            _ = shutdown.changed() => break,
            res = timeout(tuning.connect_timeout, TcpStream::connect(host)) => res,
        };
        let result = match connected {
            Ok(Ok(stream)) => {
                backoff.reset();
                info!(host = %host, "Connected to host");
                link.status.send_replace(ConnectionStatus::new(PeerState::Connected));
                session(stream, &tuning, &link, &mut shutdown).await
            }
            Ok(Err(e)) => Err(NetError::from(e)),
            Err(_) => Err(NetError::Timeout),
        };

        // A session only ends cleanly on shutdown
        let Err(e) = result else {
            break;
        };

        let delay = backoff.next_delay();
        if e.is_transient() {
            info!(host = %host, error = %e, retry_in_ms = delay.as_millis() as u64, "Disconnected");
        } else {
            warn!(host = %host, error = %e, retry_in_ms = delay.as_millis() as u64, "Connection failed");
        }
        last_error = Some(e.to_string());
        link.status.send_replace(ConnectionStatus::failed(PeerState::Disconnected, &e));

        tokio::select! {
            _ = shutdown.changed() => break,
            _ = sleep(delay) => {}
        }
    }

    link.status.send_replace(ConnectionStatus {
        state: PeerState::Stopped,
        last_error,
    });
    debug!("Client task stopped");
}

/// Exchange records with the host until the link fails or the client stops
async fn session(
    stream: TcpStream,
    tuning: &NetTuning,
    link: &ClientLink,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<(), NetError> {
    stream.set_nodelay(true)?;
    let (mut reader, mut writer) = stream.into_split();
    let mut lines = LineBuffer::new();

    loop {
        let latest = *link.input.borrow();
        if let Some(input) = latest {
            writer
                .write_all(&encode_line(&WireMessage::Input { input })?)
                .await?;
        }

        let read = tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            res = timeout(tuning.read_timeout, reader.read_buf(lines.buf_mut())) => res,
        };
        match read {
            // Nothing arrived this round
            Err(_) => {}
            Ok(Ok(0)) => return Err(NetError::Closed),
            Ok(Ok(_)) => {
                while let Some(line) = lines.next_line() {
                    ingest(&line, link);
                }
            }
            Ok(Err(e)) => return Err(e.into()),
        }

        tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            _ = sleep(tuning.client_poll) => {}
        }
    }
}

fn ingest(line: &[u8], link: &ClientLink) {
    match decode_line(line) {
        Ok(WireMessage::State { state }) => {
            link.snapshot.send_replace(Some(ReceivedSnapshot {
                snapshot: state,
                received_at: Instant::now(),
            }));
        }
        Ok(WireMessage::Input { .. }) => {
            debug!("Ignoring input record from host");
        }
        Err(ProtocolError::Empty) => {}
        Err(e) => {
            debug!(error = %e, "Dropping malformed record");
        }
    }
}
