use crate::config::resolve_log_path;
use crate::display::DisplayBatch;
use crate::error::ScanError;
use crate::scanner::LogScanner;
use crate::session_writer::{ScanSession, SessionWriter};
use crate::store::EventStore;
use sckm_core::{DisplayFilter, KillEventParser};
use sckm_runtime_config::{ConfigError, MonitorConfig};
use std::path::PathBuf;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopping,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("a scan is already running")]
    AlreadyRunning,
}

/// What one scan session did, reported when it stops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_tag: String,
    pub output_file: PathBuf,
    pub cycles: u64,
    pub events_found: usize,
    pub events_displayed: usize,
}

/// Drives [`LogScanner`] on a fixed interval from one background task.
pub struct PollScheduler {
    output_dir: PathBuf,
    state: SchedulerState,
    shutdown_tx: Option<watch::Sender<bool>>,
    worker: Option<JoinHandle<SessionSummary>>,
}

impl PollScheduler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            state: SchedulerState::Idle,
            shutdown_tx: None,
            worker: None,
        }
    }

    /// A worker that ended by itself (display closed) reports as idle.
    pub fn state(&self) -> SchedulerState {
        if self.state == SchedulerState::Running && self.worker_finished() {
            return SchedulerState::Idle;
        }
        self.state
    }

    fn worker_finished(&self) -> bool {
        self.worker.as_ref().is_some_and(JoinHandle::is_finished)
    }

    /// Validate the configuration and spawn the poll loop.
    ///
    /// Log path and handle are fixed for the session; interval and show-all
    /// are re-read from `config` every cycle. Must be called inside a tokio
    /// runtime.
    pub fn start(
        &mut self,
        config: watch::Receiver<MonitorConfig>,
        display_tx: mpsc::UnboundedSender<DisplayBatch>,
    ) -> Result<ScanSession, SchedulerError> {
        if self.state() == SchedulerState::Idle && self.worker.is_some() {
            debug!("Reaping scan worker that already ended");
            self.worker = None;
            self.shutdown_tx = None;
            self.state = SchedulerState::Idle;
        }
        if self.state != SchedulerState::Idle {
            return Err(SchedulerError::AlreadyRunning);
        }

        let snapshot = config.borrow().clone();
        if let Err(e) = snapshot.validate() {
            error!("Cannot start scan: {e}");
            return Err(e.into());
        }

        let path = resolve_log_path(&snapshot);
        let handle = snapshot.scan.handle.trim().to_string();
        debug!("Using the selected handle: {handle}");
        debug!("Using the selected channel: {}", snapshot.scan.channel);
        debug!("Using the selected log file path: {}", path.display());

        let session = ScanSession::start();
        let scanner = LogScanner::new(
            handle,
            KillEventParser::new(snapshot.scan.event_marker.clone()),
            SessionWriter::new(&self.output_dir),
        );
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let worker = ScanWorker {
            scanner,
            path,
            session: session.clone(),
            config,
            display_tx,
            shutdown: shutdown_rx,
        };
        info!("Scan session {} started", session.tag());

        self.worker = Some(tokio::spawn(worker.run()));
        self.shutdown_tx = Some(shutdown_tx);
        self.state = SchedulerState::Running;
        Ok(session)
    }

    /// Stop the loop, interrupting its sleep, and wait for the worker.
    ///
    /// Returns `None` when no scan was running.
    pub async fn stop(&mut self) -> Option<SessionSummary> {
        let worker = self.worker.take()?;
        self.state = SchedulerState::Stopping;
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(true);
        }

        let summary = match worker.await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!("Scan worker failed: {e}");
                None
            }
        };
        self.state = SchedulerState::Idle;
        summary
    }
}

struct ScanWorker {
    scanner: LogScanner,
    path: PathBuf,
    session: ScanSession,
    config: watch::Receiver<MonitorConfig>,
    display_tx: mpsc::UnboundedSender<DisplayBatch>,
    shutdown: watch::Receiver<bool>,
}

impl ScanWorker {
    async fn run(mut self) -> SessionSummary {
        let mut store = EventStore::new();
        let mut filter = DisplayFilter::new();
        let mut summary = SessionSummary {
            session_tag: self.session.tag().to_string(),
            output_file: self.scanner.writer().file_path(self.session.tag()),
            cycles: 0,
            events_found: 0,
            events_displayed: 0,
        };

        loop {
            if *self.shutdown.borrow() {
                break;
            }
            summary.cycles += 1;

            match self.scanner.scan_once(&self.path, &self.session, &mut store) {
                Ok(found) => {
                    summary.events_found += found;
                    debug!(
                        "Finished extracting kill events from {} ({found} new, {} total)",
                        self.path.display(),
                        store.len()
                    );
                }
                Err(e @ ScanError::NotFound(_)) => warn!("{e}; retrying next cycle"),
                Err(e) => error!("Scan cycle aborted: {e}"),
            }

            let (show_all, interval) = {
                let config = self.config.borrow_and_update();
                (config.scan.show_all, config.interval())
            };
            let events = filter.select(store.iter(), self.scanner.handle(), show_all);
            summary.events_displayed += events.len();
            let batch = DisplayBatch {
                cycle: summary.cycles,
                events,
            };
            if self.display_tx.send(batch).is_err() {
                info!("Display closed, ending scan session {}", summary.session_tag);
                break;
            }

            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(
            "Scan session {} stopped after {} cycle(s), {} event(s) recorded",
            summary.session_tag, summary.cycles, summary.events_found
        );
        summary
    }
}
