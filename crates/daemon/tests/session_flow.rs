use sckm_core::testing::{kill_line, noise_line};
use sckm_core::KillEventParser;
use sckm_daemon::{
    display, ConfigHandle, EventStore, LogScanner, PollScheduler, ScanError, ScanSession,
    SessionWriter, TextBlockSink,
};
use sckm_runtime_config::{Channel, MonitorConfig};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;

fn write_lines(path: &Path, lines: &[String]) {
    std::fs::write(path, lines.join("\n") + "\n").unwrap();
}

#[test]
fn log_appearing_later_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("game.log");
    let scanner = LogScanner::new(
        "Alice",
        KillEventParser::default(),
        SessionWriter::new(dir.path().join("out")),
    );
    let session = ScanSession::start();
    let mut store = EventStore::new();

    let err = scanner.scan_once(&log, &session, &mut store).unwrap_err();
    assert!(matches!(err, ScanError::NotFound(_)));
    assert!(store.is_empty());

    write_lines(
        &log,
        &[
            noise_line("2025-06-14T19:30:00Z"),
            kill_line("2025-06-14T19:30:45.123Z", "Alice", "Bob"),
        ],
    );
    assert_eq!(scanner.scan_once(&log, &session, &mut store).unwrap(), 1);
    assert_eq!(store.iter().next().unwrap().killer, "Bob");
}

#[tokio::test]
async fn scan_session_renders_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("game.log");
    write_lines(
        &log,
        &[
            kill_line("2025-06-14T19:30:43Z", "Alice", "Bob"),
            noise_line("2025-06-14T19:30:44Z"),
            kill_line("2025-06-14T19:30:45Z", "Alice", "PU_Pilots-Human-Criminal"),
            kill_line("2025-06-14T19:30:40Z", "Alice", "Carol"),
            kill_line("2025-06-14T19:30:41Z", "Dave", "Alice"),
        ],
    );

    let mut config = MonitorConfig::default();
    config.scan.channel = Channel::Custom;
    config.paths.custom = log.to_string_lossy().to_string();
    config.scan.handle = "Alice".to_string();
    let handle = ConfigHandle::new(config);

    let (tx, rx) = mpsc::unbounded_channel();
    let mut scheduler = PollScheduler::new(dir.path().join("sessions"));
    scheduler.start(handle.subscribe(), tx).unwrap();

    let mut sink = TextBlockSink::new(Vec::new());
    let pump = async {
        let applied = display::pump(rx, &mut sink).await;
        assert!(applied >= 1);
    };
    let stop = async {
        tokio::time::sleep(Duration::from_millis(300)).await;
        scheduler.stop().await.expect("summary")
    };
    let ((), summary) = tokio::time::timeout(Duration::from_secs(10), async {
        tokio::join!(pump, stop)
    })
    .await
    .expect("session ends in time");

    assert_eq!(summary.events_found, 3);
    assert_eq!(summary.events_displayed, 2);

    let rendered = String::from_utf8(sink.into_inner()).unwrap();
    let killers: Vec<&str> = rendered
        .lines()
        .filter_map(|line| line.strip_prefix("Killer = "))
        .collect();
    assert_eq!(killers, vec!["Bob", "Carol"]);

    let persisted = std::fs::read_to_string(&summary.output_file).unwrap();
    assert_eq!(persisted.matches("Kill Date = ").count(), 3);
    assert!(persisted.contains("Killer = PU_Pilots-Human-Criminal"));
    assert!(!persisted.contains("Killed Player = Dave"));
}
