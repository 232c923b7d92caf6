// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::PathBuf;
use tempfile::TempDir;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

fn script(dir: &TempDir, name: &str, body: &str) -> String {
    let path: PathBuf = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path.to_string_lossy().into_owned()
}

async fn recv(rx: &mut mpsc::Receiver<ProcessEvent>) -> ProcessEvent {
    tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for process event")
        .expect("event channel closed")
}

/// Collect events up to and including the first `Exited`.
async fn until_exit(rx: &mut mpsc::Receiver<ProcessEvent>) -> Vec<ProcessEvent> {
    let mut events = Vec::new();
    loop {
        let event = recv(rx).await;
        let done = matches!(event, ProcessEvent::Exited { .. });
        events.push(event);
        if done {
            return events;
        }
    }
}

/// Wait for every sender to go away and return whatever arrived first.
async fn drain_until_closed(rx: &mut mpsc::Receiver<ProcessEvent>) -> Vec<ProcessEvent> {
    let mut events = Vec::new();
    while let Some(event) = tokio::time::timeout(RECV_TIMEOUT, rx.recv())
        .await
        .expect("timed out waiting for event channel to close")
    {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn launch_streams_lines_then_exit() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "parser.sh", "echo '{\"type\":\"tick\",\"counter\":1}'\necho oops >&2\nexit 3\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, mut rx) = mpsc::channel(16);

    adapter.launch(ToolId::Parser, "sh", &path, tx).await.unwrap();
    let events = until_exit(&mut rx).await;

    assert!(events.contains(&ProcessEvent::stdout(
        ToolId::Parser,
        r#"{"type":"tick","counter":1}"#
    )));
    assert!(events.contains(&ProcessEvent::stderr(ToolId::Parser, "oops")));
    assert_eq!(
        events.last(),
        Some(&ProcessEvent::Exited {
            tool: ToolId::Parser,
            exit_code: Some(3)
        })
    );
    assert!(!adapter.is_alive(ToolId::Parser).await.unwrap());
}

#[tokio::test]
async fn stdout_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "count.sh", "for i in 1 2 3 4 5; do echo line$i; done\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, mut rx) = mpsc::channel(16);

    adapter.launch(ToolId::Viewer, "sh", &path, tx).await.unwrap();
    let lines: Vec<String> = until_exit(&mut rx)
        .await
        .into_iter()
        .filter_map(|e| match e {
            ProcessEvent::Line { line, .. } => Some(line),
            ProcessEvent::Exited { .. } => None,
        })
        .collect();

    assert_eq!(lines, vec!["line1", "line2", "line3", "line4", "line5"]);
}

#[tokio::test]
async fn terminate_kills_running_process() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "serve.sh", "echo ready\nexec sleep 30\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, mut rx) = mpsc::channel(16);

    adapter.launch(ToolId::Viewer, "sh", &path, tx).await.unwrap();
    assert_eq!(recv(&mut rx).await, ProcessEvent::stdout(ToolId::Viewer, "ready"));
    assert!(adapter.is_alive(ToolId::Viewer).await.unwrap());

    adapter.terminate(ToolId::Viewer).await.unwrap();

    assert!(!adapter.is_alive(ToolId::Viewer).await.unwrap());
    let events = drain_until_closed(&mut rx).await;
    assert!(events.is_empty(), "terminated process reports no exit: {events:?}");
}

#[tokio::test]
async fn terminate_without_process_is_ok() {
    let adapter = LocalProcessAdapter::new();
    adapter.terminate(ToolId::Parser).await.unwrap();
    assert!(!adapter.is_alive(ToolId::Parser).await.unwrap());
}

#[tokio::test]
async fn launch_missing_executable_fails() {
    let adapter = LocalProcessAdapter::new();
    let (tx, _rx) = mpsc::channel(16);

    let err = adapter
        .launch(ToolId::Parser, "/nonexistent/php", "parser.php", tx)
        .await
        .unwrap_err();

    assert!(matches!(err, ProcessError::SpawnFailed(_)), "got: {err:?}");
    assert!(!adapter.is_alive(ToolId::Parser).await.unwrap());
}

#[tokio::test]
async fn relaunch_replaces_previous_process_silently() {
    let dir = TempDir::new().unwrap();
    let first = script(&dir, "first.sh", "echo first\nexec sleep 30\n");
    let second = script(&dir, "second.sh", "echo second\nexec sleep 30\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, mut rx) = mpsc::channel(16);

    adapter
        .launch(ToolId::Parser, "sh", &first, tx.clone())
        .await
        .unwrap();
    assert_eq!(recv(&mut rx).await, ProcessEvent::stdout(ToolId::Parser, "first"));

    adapter.launch(ToolId::Parser, "sh", &second, tx).await.unwrap();
    assert_eq!(recv(&mut rx).await, ProcessEvent::stdout(ToolId::Parser, "second"));
    assert!(adapter.is_alive(ToolId::Parser).await.unwrap());

    adapter.terminate(ToolId::Parser).await.unwrap();
    let events = drain_until_closed(&mut rx).await;
    assert!(events.is_empty(), "got: {events:?}");
}

#[tokio::test]
async fn stopped_process_exit_does_not_reach_next_launch() {
    let dir = TempDir::new().unwrap();
    let first = script(&dir, "first.sh", "echo first\nexec sleep 30\n");
    let second = script(&dir, "second.sh", "echo second\nexec sleep 30\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, mut rx) = mpsc::channel(16);

    adapter
        .launch(ToolId::Parser, "sh", &first, tx.clone())
        .await
        .unwrap();
    assert_eq!(recv(&mut rx).await, ProcessEvent::stdout(ToolId::Parser, "first"));
    adapter.terminate(ToolId::Parser).await.unwrap();

    adapter.launch(ToolId::Parser, "sh", &second, tx).await.unwrap();
    assert_eq!(recv(&mut rx).await, ProcessEvent::stdout(ToolId::Parser, "second"));

    // Long enough for the first monitor to finish draining and report
    tokio::time::sleep(READER_DRAIN_TIMEOUT + Duration::from_millis(500)).await;
    assert!(
        matches!(rx.try_recv(), Err(mpsc::error::TryRecvError::Empty)),
        "no exit from the stopped process"
    );
    assert!(adapter.is_alive(ToolId::Parser).await.unwrap());

    adapter.terminate(ToolId::Parser).await.unwrap();
    let events = drain_until_closed(&mut rx).await;
    assert!(events.is_empty(), "got: {events:?}");
}

#[tokio::test]
async fn tools_are_independent() {
    let dir = TempDir::new().unwrap();
    let path = script(&dir, "serve.sh", "exec sleep 30\n");
    let adapter = LocalProcessAdapter::new();
    let (tx, _rx) = mpsc::channel(16);

    adapter
        .launch(ToolId::Viewer, "sh", &path, tx.clone())
        .await
        .unwrap();
    adapter.launch(ToolId::Parser, "sh", &path, tx).await.unwrap();
    adapter.terminate(ToolId::Parser).await.unwrap();

    assert!(adapter.is_alive(ToolId::Viewer).await.unwrap());
    assert!(!adapter.is_alive(ToolId::Parser).await.unwrap());
    adapter.terminate(ToolId::Viewer).await.unwrap();
}

#[yare::parameterized(
    lf    = { "line\n", "line" },
    crlf  = { "line\r\n", "line" },
    none  = { "line", "line" },
    empty = { "\n", "" },
)]
fn line_endings_are_stripped(input: &str, expected: &str) {
    assert_eq!(strip_line_ending(input.as_bytes()), expected.as_bytes());
}
