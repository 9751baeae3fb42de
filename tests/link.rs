mod support;

use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_test::assert_ok;

use arena_duel::game::ControlState;
use arena_duel::net::protocol::{decode_line, encode_line};
use arena_duel::net::{NetTuning, NetworkClient, NetworkHost, PeerState, WireMessage};

use support::{fast_tuning, loopback, opening_snapshot, wait_until};

const FIRE_UP: ControlState = ControlState {
    up: true,
    fire: true,
    ..ControlState::IDLE
};

const DOWN: ControlState = ControlState {
    down: true,
    ..ControlState::IDLE
};

#[tokio::test]
async fn client_and_host_exchange_input_and_state() {
    let host = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);
    let snapshot = opening_snapshot();
    host.publish(snapshot.clone());

    let mut client = NetworkClient::connect(host.local_addr(), fast_tuning(), 1.0);
    client.send_input(FIRE_UP);

    wait_until("remote input", || host.remote_input() == FIRE_UP).await;
    wait_until("first snapshot", || client.latest_snapshot().is_some()).await;

    assert!(host.status().is_connected());
    assert!(client.status().is_connected());

    let received = client.latest_snapshot().map(|r| r.snapshot);
    assert_eq!(received.as_ref(), Some(&snapshot));
    // Alpha 1 snaps straight to the target
    assert_eq!(client.render_step(), Some(&snapshot));

    client.stop().await;
    host.stop().await;
}

#[tokio::test]
async fn host_skips_garbage_and_keeps_the_link() {
    let host = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);
    host.publish(opening_snapshot());

    let stream = assert_ok!(TcpStream::connect(host.local_addr()).await);
    let (reader, mut writer) = stream.into_split();

    let valid = assert_ok!(encode_line(&WireMessage::Input { input: FIRE_UP }));
    assert_ok!(writer.write_all(b"{not json}\n\n").await);
    assert_ok!(writer.write_all(&valid).await);

    wait_until("input after garbage", || host.remote_input() == FIRE_UP).await;

    // The same session still streams state records
    let mut lines = BufReader::new(reader).lines();
    let line = assert_ok!(lines.next_line().await).unwrap_or_default();
    match assert_ok!(decode_line(line.as_bytes())) {
        WireMessage::State { state } => assert_eq!(state.ship1.health, 7),
        other => panic!("expected a state record, got {other:?}"),
    }

    host.stop().await;
}

#[tokio::test]
async fn host_keeps_last_input_after_client_leaves() {
    let host = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);

    let mut stream = assert_ok!(TcpStream::connect(host.local_addr()).await);
    let record = assert_ok!(encode_line(&WireMessage::Input { input: FIRE_UP }));
    assert_ok!(stream.write_all(&record).await);
    wait_until("remote input", || host.remote_input() == FIRE_UP).await;

    drop(stream);
    wait_until("host back to idle", || host.status().state == PeerState::Idle).await;
    assert_eq!(host.remote_input(), FIRE_UP);

    host.stop().await;
}

#[tokio::test]
async fn client_reconnects_after_host_restart() {
    let host = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);
    let addr = host.local_addr();
    host.publish(opening_snapshot());

    let client = NetworkClient::connect(addr, fast_tuning(), 1.0);
    wait_until("first connect", || client.status().is_connected()).await;

    host.stop().await;
    wait_until("disconnect noticed", || !client.status().is_connected()).await;
    assert!(client.status().last_error.is_some());

    let restarted_at = Instant::now();
    let host = assert_ok!(NetworkHost::bind(addr, fast_tuning()).await);
    host.publish(opening_snapshot());

    wait_until("reconnect", || client.status().is_connected()).await;
    wait_until("fresh snapshot", || {
        client
            .latest_snapshot()
            .is_some_and(|r| r.received_at >= restarted_at)
    })
    .await;

    client.stop().await;
    host.stop().await;
}

#[tokio::test]
async fn client_records_refused_connects() {
    // Nothing listens here once the probe host is gone
    let probe = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);
    let addr = probe.local_addr();
    probe.stop().await;

    let client = NetworkClient::connect(addr, fast_tuning(), 0.5);
    wait_until("failed attempt", || client.status().last_error.is_some()).await;
    assert!(!client.status().is_connected());

    client.stop().await;
}

#[tokio::test]
async fn second_client_waits_for_the_first_to_leave() {
    let host = assert_ok!(NetworkHost::bind(loopback(), fast_tuning()).await);
    host.publish(opening_snapshot());

    let mut first = assert_ok!(TcpStream::connect(host.local_addr()).await);
    let record = assert_ok!(encode_line(&WireMessage::Input { input: FIRE_UP }));
    assert_ok!(first.write_all(&record).await);
    wait_until("first input", || host.remote_input() == FIRE_UP).await;

    // Queued in the listen backlog; not served while the first session runs
    let second = assert_ok!(TcpStream::connect(host.local_addr()).await);
    let (reader, mut writer) = second.into_split();
    let record = assert_ok!(encode_line(&WireMessage::Input { input: DOWN }));
    assert_ok!(writer.write_all(&record).await);

    let mut lines = BufReader::new(reader).lines();
    let waiting = tokio::time::timeout(Duration::from_millis(200), lines.next_line()).await;
    assert!(waiting.is_err(), "second client was served too early");
    assert_eq!(host.remote_input(), FIRE_UP);

    drop(first);
    wait_until("second input", || host.remote_input() == DOWN).await;
    let line = assert_ok!(lines.next_line().await).unwrap_or_default();
    assert!(matches!(
        assert_ok!(decode_line(line.as_bytes())),
        WireMessage::State { .. }
    ));

    host.stop().await;
}

#[tokio::test]
async fn backoff_restarts_after_a_successful_session() {
    let tuning = NetTuning {
        backoff_base: Duration::from_millis(50),
        backoff_max: Duration::from_secs(3),
        ..fast_tuning()
    };
    let probe = assert_ok!(NetworkHost::bind(loopback(), tuning).await);
    let addr = probe.local_addr();
    probe.stop().await;

    // Let a run of refused attempts grow the delay past 400ms
    let client = NetworkClient::connect(addr, tuning, 1.0);
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert!(!client.status().is_connected());

    let host = assert_ok!(NetworkHost::bind(addr, tuning).await);
    wait_until("connect after failures", || client.status().is_connected()).await;
    host.stop().await;
    wait_until("disconnect noticed", || !client.status().is_connected()).await;

    // A fresh session resets the delay, so the retry comes after about 50ms
    let restarted_at = Instant::now();
    let host = assert_ok!(NetworkHost::bind(addr, tuning).await);
    wait_until("quick reconnect", || client.status().is_connected()).await;
    assert!(
        restarted_at.elapsed() < Duration::from_millis(400),
        "reconnect took {:?}",
        restarted_at.elapsed()
    );

    client.stop().await;
    host.stop().await;
}
