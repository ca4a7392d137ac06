// file: tests/integration_test.rs
// version: 1.0.0
// guid: d94ba043-8fbc-4af7-bc0d-5cd3a3fe17fa

//! Integration tests for the ds-sim scheduling client
//!
//! A scripted mock of ds-server runs on a local TCP port; each test drives a
//! full session against it and inspects the SCHD commands the client issued.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use ds_client::{protocol::Connection, scheduler::Algorithm, session::Session};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpListener;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Scripted behavior for the mock server
#[derive(Default)]
struct MockServer {
    /// Replies to successive REDY commands; exhausted means NONE
    events: VecDeque<String>,
    /// Record lines for GETS Avail
    avail: Vec<String>,
    /// Record lines for GETS Capable
    capable: Vec<String>,
    /// EJWT replies keyed by "<type> <id>"
    waits: HashMap<String, u64>,
    /// Reply ERR to HELO instead of OK
    reject_helo: bool,
}

async fn send_line(writer: &mut OwnedWriteHalf, line: &str) -> anyhow::Result<()> {
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

async fn expect_line(lines: &mut Lines<BufReader<OwnedReadHalf>>, want: &str) -> anyhow::Result<()> {
    let got = lines
        .next_line()
        .await?
        .ok_or_else(|| anyhow::anyhow!("client disconnected, expected {want}"))?;
    anyhow::ensure!(got == want, "expected {want}, client sent {got}");
    Ok(())
}

/// Serve one client connection; returns the SCHD lines observed
async fn serve(listener: TcpListener, mut mock: MockServer) -> anyhow::Result<Vec<String>> {
    let (stream, _) = listener.accept().await?;
    let (read_half, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut scheduled = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if line == "HELO" {
            if mock.reject_helo {
                send_line(&mut writer, "ERR unauthorised").await?;
                continue;
            }
            send_line(&mut writer, "OK").await?;
        } else if line.starts_with("AUTH ") {
            send_line(&mut writer, "OK").await?;
        } else if line == "REDY" {
            let event = mock.events.pop_front().unwrap_or_else(|| "NONE".to_string());
            send_line(&mut writer, &event).await?;
        } else if line.starts_with("GETS ") {
            let records = if line.starts_with("GETS Avail") {
                &mock.avail
            } else {
                &mock.capable
            };
            send_line(&mut writer, &format!("DATA {} 124", records.len())).await?;
            expect_line(&mut lines, "OK").await?;
            for record in records {
                send_line(&mut writer, record).await?;
            }
            expect_line(&mut lines, "OK").await?;
            send_line(&mut writer, ".").await?;
        } else if let Some(key) = line.strip_prefix("EJWT ") {
            let wait = mock.waits.get(key).copied().unwrap_or(0);
            send_line(&mut writer, &wait.to_string()).await?;
        } else if line.starts_with("SCHD ") {
            scheduled.push(line);
            send_line(&mut writer, "OK").await?;
        } else if line == "QUIT" {
            send_line(&mut writer, "QUIT").await?;
            break;
        } else {
            anyhow::bail!("unexpected client command: {line}");
        }
    }

    Ok(scheduled)
}

async fn start_mock(mock: MockServer) -> (u16, tokio::task::JoinHandle<anyhow::Result<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(serve(listener, mock));
    (port, handle)
}

#[tokio::test]
async fn test_fc_schedules_on_first_capable_server() {
    let mock = MockServer {
        events: VecDeque::from(["JOBN 37 1 520 2 4000 32000".to_string()]),
        capable: vec![
            "small 0 idle -1 2 4000 32000 0 0".to_string(),
            "medium 0 idle -1 4 16000 64000 0 0".to_string(),
        ],
        ..Default::default()
    };
    let (port, handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let stats = Session::new(conn, Algorithm::Fc).run("tester").await.unwrap();

    assert_eq!(stats.jobs_scheduled, 1);
    let scheduled = handle.await.unwrap().unwrap();
    assert_eq!(scheduled, vec!["SCHD 1 small 0".to_string()]);
}

#[tokio::test]
async fn test_ect_prefers_immediately_available_server() {
    let mock = MockServer {
        events: VecDeque::from(["JOBN 37 1 520 2 4000 32000".to_string()]),
        avail: vec!["medium 0 idle -1 4 16000 64000 0 0".to_string()],
        capable: vec![
            "small 0 idle -1 2 4000 32000 1 1".to_string(),
            "medium 0 idle -1 4 16000 64000 0 0".to_string(),
        ],
        ..Default::default()
    };
    let (port, handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let stats = Session::new(conn, Algorithm::Ect).run("tester").await.unwrap();

    assert_eq!(stats.jobs_scheduled, 1);
    let scheduled = handle.await.unwrap().unwrap();
    assert_eq!(scheduled, vec!["SCHD 1 medium 0".to_string()]);
}

#[tokio::test]
async fn test_ect_falls_back_to_smallest_estimated_wait() {
    let mock = MockServer {
        events: VecDeque::from(["JOBN 37 1 520 2 4000 32000".to_string()]),
        capable: vec![
            "small 0 active -1 2 4000 32000 2 1".to_string(),
            "medium 0 active -1 4 16000 64000 1 2".to_string(),
            "large 0 active -1 8 64000 512000 3 1".to_string(),
        ],
        waits: HashMap::from([
            ("small 0".to_string(), 400),
            ("medium 0".to_string(), 120),
            ("large 0".to_string(), 900),
        ]),
        ..Default::default()
    };
    let (port, handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let stats = Session::new(conn, Algorithm::Ect).run("tester").await.unwrap();

    assert_eq!(stats.jobs_scheduled, 1);
    let scheduled = handle.await.unwrap().unwrap();
    assert_eq!(scheduled, vec!["SCHD 1 medium 0".to_string()]);
}

#[tokio::test]
async fn test_session_counts_completions_failures_and_recoveries() {
    let mock = MockServer {
        events: VecDeque::from([
            "JOBN 37 1 520 2 4000 32000".to_string(),
            "JCPL 557 1 small 0".to_string(),
            "RESF large 0 1200".to_string(),
            "RESR large 0 2400".to_string(),
        ]),
        capable: vec!["small 0 idle -1 2 4000 32000 0 0".to_string()],
        ..Default::default()
    };
    let (port, handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let stats = Session::new(conn, Algorithm::Fc).run("tester").await.unwrap();

    assert_eq!(stats.jobs_scheduled, 1);
    assert_eq!(stats.jobs_completed, 1);
    assert_eq!(stats.server_failures, 1);
    assert_eq!(stats.server_recoveries, 1);
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_server_error_event_fails_session() {
    let mock = MockServer {
        events: VecDeque::from(["ERR invalid command".to_string()]),
        ..Default::default()
    };
    let (port, _handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let result = Session::new(conn, Algorithm::Ect).run("tester").await;

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("invalid command"));
}

#[tokio::test]
async fn test_rejected_handshake_fails_session() {
    let mock = MockServer {
        reject_helo: true,
        ..Default::default()
    };
    let (port, _handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let result = Session::new(conn, Algorithm::Ect).run("tester").await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_no_capable_server_is_a_scheduling_error() {
    let mock = MockServer {
        events: VecDeque::from(["JOBN 37 1 520 64 640000 6400000".to_string()]),
        ..Default::default()
    };
    let (port, _handle) = start_mock(mock).await;

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let result = Session::new(conn, Algorithm::Fc).run("tester").await;

    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("no server capable"));
}

#[tokio::test]
async fn test_oversized_data_header_fails_cleanly() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    // Hand-rolled peer: valid handshake, one job, then a DATA header whose
    // count is absurd, followed by a hangup
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await?;
        let (read_half, mut writer) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        expect_line(&mut lines, "HELO").await?;
        send_line(&mut writer, "OK").await?;
        lines.next_line().await?; // AUTH
        send_line(&mut writer, "OK").await?;
        expect_line(&mut lines, "REDY").await?;
        send_line(&mut writer, "JOBN 37 1 520 2 4000 32000").await?;
        lines.next_line().await?; // GETS Capable
        send_line(&mut writer, "DATA 9999999999 124").await?;
        expect_line(&mut lines, "OK").await?;
        anyhow::Ok(())
    });

    let conn = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT)
        .await
        .unwrap();
    let result = Session::new(conn, Algorithm::Fc).run("tester").await;

    // The client must report the dropped connection, not abort allocating
    assert!(result.is_err());
}

#[tokio::test]
async fn test_connect_refused() {
    // Bind then drop to get a port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = Connection::connect("127.0.0.1", port, CONNECT_TIMEOUT).await;
    assert!(result.is_err());
}

mod cli {
    use assert_cmd::Command;
    use predicates::prelude::*;

    #[test]
    fn test_help_lists_documented_flags() {
        Command::cargo_bin("ds-client")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("--algo"))
            .stdout(predicate::str::contains("--port"));
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        Command::cargo_bin("ds-client")
            .unwrap()
            .args(["--algo", "round-robin"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("algo"));
    }
}
