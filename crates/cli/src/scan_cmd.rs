use anyhow::{Context, Result};
use clap::Args;
use sckm_daemon::config::{load_config, resolve_log_path, resolve_output_dir};
use sckm_daemon::{display, ConfigHandle, PollScheduler, TextBlockSink};
use sckm_runtime_config::{Channel, MonitorConfig};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Debug, Clone, Args)]
pub struct ScanArgs {
    /// Game channel to follow (LIVE, PTU, EPTU, HOTFIX, TECH_PREVIEW, CUSTOM).
    #[arg(long)]
    pub channel: Option<Channel>,
    /// Player handle whose deaths are tracked.
    #[arg(long)]
    pub handle: Option<String>,
    /// Log file to scan; implies the CUSTOM channel.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Seconds between two scans.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
    /// Show NPC, environmental and self-inflicted deaths (true/false).
    #[arg(long)]
    pub show_all: Option<bool>,
    /// Directory for the session's kill file.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Overrides from the command line. Never persisted.
fn apply_overrides(config: &mut MonitorConfig, args: &ScanArgs) {
    if let Some(channel) = args.channel {
        config.scan.channel = channel;
    }
    if let Some(path) = &args.log_file {
        config.scan.channel = Channel::Custom;
        config.paths.custom = path.to_string_lossy().to_string();
    }
    if let Some(handle) = &args.handle {
        config.scan.handle = handle.clone();
    }
    if let Some(interval) = args.interval {
        config.scan.interval_secs = interval;
    }
    if let Some(show_all) = args.show_all {
        config.scan.show_all = show_all;
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.to_string_lossy().to_string();
    }
}

pub async fn run(args: ScanArgs) -> Result<()> {
    let mut config = load_config().context("failed to load settings")?;
    apply_overrides(&mut config, &args);
    let output_dir =
        resolve_output_dir(&config).context("failed to resolve the session output directory")?;
    let log_path = resolve_log_path(&config);
    let settings = ConfigHandle::new(config);

    let (tx, rx) = mpsc::unbounded_channel();
    let mut scheduler = PollScheduler::new(&output_dir);
    let session = scheduler.start(settings.subscribe(), tx)?;
    eprintln!(
        "Scanning {} (session {}, kills saved to {}). Press Ctrl+C to stop.",
        log_path.display(),
        session.tag(),
        output_dir.display()
    );

    let mut sink = TextBlockSink::new(std::io::stdout());
    let display = display::pump(rx, &mut sink);
    tokio::pin!(display);

    let interrupted = tokio::select! {
        _ = &mut display => {
            warn!("Display loop ended before shutdown");
            false
        }
        _ = wait_for_shutdown() => {
            info!("Shutdown signal received, stopping...");
            true
        }
    };

    let summary = scheduler.stop().await;
    if interrupted {
        display.await;
    }

    if let Some(summary) = summary {
        eprintln!(
            "Session {} stopped after {} scan(s): {} kill(s) recorded, {} shown.",
            summary.session_tag, summary.cycles, summary.events_found, summary.events_displayed
        );
        if summary.events_found > 0 {
            eprintln!("Kill file: {}", summary.output_file.display());
        }
    }
    Ok(())
}

/// Wait for SIGTERM or SIGINT
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(mut sigterm), Ok(mut sigint)) => {
                tokio::select! {
                    _ = sigterm.recv() => info!("Received SIGTERM"),
                    _ = sigint.recv() => info!("Received SIGINT"),
                }
                return;
            }
            (Err(e), _) | (_, Err(e)) => warn!("Failed to register signal handlers: {e}"),
        }
    }

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ScanArgs {
        ScanArgs {
            channel: None,
            handle: None,
            log_file: None,
            interval: None,
            show_all: None,
            output_dir: None,
        }
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let mut config = MonitorConfig::default();
        config.scan.show_all = true;
        let before = config.clone();
        apply_overrides(&mut config, &args());
        assert_eq!(config, before);
    }

    #[test]
    fn test_show_all_can_be_turned_off() {
        let mut config = MonitorConfig::default();
        config.scan.show_all = true;
        let mut overrides = args();
        overrides.show_all = Some(false);
        apply_overrides(&mut config, &overrides);
        assert!(!config.scan.show_all);
    }

    #[test]
    fn test_log_file_selects_custom_channel() {
        let mut config = MonitorConfig::default();
        let mut overrides = args();
        overrides.channel = Some(Channel::Ptu);
        overrides.log_file = Some(PathBuf::from("/tmp/game.log"));
        overrides.handle = Some("Alice".to_string());
        overrides.interval = Some(5);
        overrides.show_all = Some(true);
        overrides.output_dir = Some(PathBuf::from("/tmp/out"));
        apply_overrides(&mut config, &overrides);

        assert_eq!(config.scan.channel, Channel::Custom);
        assert_eq!(config.log_path(), "/tmp/game.log");
        assert_eq!(config.scan.handle, "Alice");
        assert_eq!(config.scan.interval_secs, 5);
        assert!(config.scan.show_all);
        assert_eq!(config.output.dir, "/tmp/out");
    }
}
