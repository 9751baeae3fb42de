//! Host side of the duel link
//!
//! Accepts one client at a time, caches its latest input and streams the
//! latest published snapshot back on a fixed cadence.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::game::snapshot::SnapshotStats;
use crate::game::{ControlState, NetworkSnapshot};
use crate::util::rate_limit::InputRateLimiter;

use super::codec::LineBuffer;
use super::protocol::{decode_line, encode_line, ProtocolError, WireMessage};
use super::{ConnectionStatus, NetError, NetTuning, PeerState};

/// Background task ends of the host's single-slot channels
struct HostLink {
    input: watch::Sender<ControlState>,
    snapshot: watch::Receiver<Option<NetworkSnapshot>>,
    status: watch::Sender<ConnectionStatus>,
}

/// Listening endpoint for the remote combatant
pub struct NetworkHost {
    local_addr: SocketAddr,
    remote_input: watch::Receiver<ControlState>,
    snapshot: watch::Sender<Option<NetworkSnapshot>>,
    status: watch::Receiver<ConnectionStatus>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl NetworkHost {
    /// Bind `addr` and start accepting in the background
    pub async fn bind(addr: SocketAddr, tuning: NetTuning) -> Result<Self, NetError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!(addr = %local_addr, "Host listening");

        let (input_tx, remote_input) = watch::channel(ControlState::IDLE);
        let (snapshot, snapshot_rx) = watch::channel(None);
        let (status_tx, status) = watch::channel(ConnectionStatus::new(PeerState::Listening));
        let (shutdown, shutdown_rx) = watch::channel(false);

        let link = HostLink {
            input: input_tx,
            snapshot: snapshot_rx,
            status: status_tx,
        };
        let task = tokio::spawn(accept_loop(listener, tuning, link, shutdown_rx));

        Ok(Self {
            local_addr,
            remote_input,
            snapshot,
            status,
            shutdown,
            task: Some(task),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Latest input received from the client; stale after a disconnect
    pub fn remote_input(&self) -> ControlState {
        *self.remote_input.borrow()
    }

    /// Replace the snapshot sent on the next cadence tick
    pub fn publish(&self, snapshot: NetworkSnapshot) {
        self.snapshot.send_replace(Some(snapshot));
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status.borrow().clone()
    }

    /// Stop accepting, drop any client and wait for the task to finish
    pub async fn stop(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Host task failed");
            }
        }
    }
}

impl Drop for NetworkHost {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

async fn accept_loop(
    listener: TcpListener,
    tuning: NetTuning,
    link: HostLink,
    mut shutdown: watch::Receiver<bool>,
) {
    link.status.send_replace(ConnectionStatus::new(PeerState::Idle));

    loop {
        if *shutdown.borrow() {
            break;
        }

        let accepted = tokio::select! {
            _ = shutdown.changed() => break,
            res = timeout(tuning.accept_poll, listener.accept()) => res,
        };
        let (stream, peer) = match accepted {
            // Poll timeout, check the stop flag again
            Err(_) => continue,
            Ok(Err(e)) => {
                let err = NetError::from(e);
                warn!(error = %err, "Accept failed");
                link.status.send_replace(ConnectionStatus::failed(PeerState::Idle, &err));
                continue;
            }
            Ok(Ok(pair)) => pair,
        };

        info!(peer = %peer, "Client connected");
        link.status.send_replace(ConnectionStatus::new(PeerState::Connected));

        match serve_client(stream, &tuning, &link, &mut shutdown).await {
            Ok(()) => {
                info!(peer = %peer, "Client session closed");
                link.status.send_replace(ConnectionStatus::new(PeerState::Idle));
            }
            Err(e) => {
                if e.is_transient() {
                    info!(peer = %peer, error = %e, "Client disconnected");
                } else {
                    warn!(peer = %peer, error = %e, "Client session failed");
                }
                link.status.send_replace(ConnectionStatus::failed(PeerState::Idle, &e));
            }
        }
    }

    link.status.send_replace(ConnectionStatus::new(PeerState::Stopped));
    debug!("Host task stopped");
}

/// Run one client session until it fails or the host stops
async fn serve_client(
    stream: TcpStream,
    tuning: &NetTuning,
    link: &HostLink,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<(), NetError> {
    stream.set_nodelay(true)?;
    let (mut reader, mut writer) = stream.into_split();

    let limiter = InputRateLimiter::new(tuning.input_rate_limit);
    let mut lines = LineBuffer::new();
    let mut stats = SnapshotStats::default();
    let mut send_tick = interval(tuning.send_interval);
    send_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => return Ok(()),
            read = reader.read_buf(lines.buf_mut()) => {
                if read? == 0 {
                    return Err(NetError::Closed);
                }
                while let Some(line) = lines.next_line() {
                    ingest(&line, &limiter, link);
                }
            }
            _ = send_tick.tick() => {
                let latest = link.snapshot.borrow().clone();
                if let Some(state) = latest {
                    let bullets = state.bullets.len();
                    let record = encode_line(&WireMessage::State { state })?;
                    writer.write_all(&record).await?;
                    stats.record(bullets, record.len());

                    if stats.total_snapshots % 200 == 0 {
                        debug!(
                            snapshots = stats.total_snapshots,
                            bytes = stats.total_bytes,
                            avg_bullets = stats.avg_bullets_per_snapshot,
                            "Snapshot stream"
                        );
                    }
                }
            }
        }
    }
}

/// Apply one inbound record; anything but a well-formed input is dropped
fn ingest(line: &[u8], limiter: &InputRateLimiter, link: &HostLink) {
    match decode_line(line) {
        Ok(WireMessage::Input { input }) => {
            if limiter.check() {
                link.input.send_replace(input);
            } else {
                debug!("Rate limited input record");
            }
        }
        Ok(WireMessage::State { .. }) => {
            debug!("Ignoring state record from client");
        }
        Err(ProtocolError::Empty) => {}
        Err(e) => {
            debug!(error = %e, "Dropping malformed record");
        }
    }
}
