use anyhow::{Context, Result};
use clap::Args;
use sckm_daemon::ConfigHandle;
use sckm_daemon::config::{config_path, load_config, resolve_output_dir};
use sckm_runtime_config::{Channel, MonitorConfig};

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Select the game channel.
    #[arg(long)]
    pub channel: Option<Channel>,
    /// Set the tracked player handle.
    #[arg(long)]
    pub handle: Option<String>,
    /// Seconds between two scans.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,
    /// Show NPC, environmental and self-inflicted deaths (true/false).
    #[arg(long)]
    pub show_all: Option<bool>,
    /// Set a channel's log file, e.g. `--path PTU=D:\StarCitizen\PTU\game.log`.
    #[arg(long = "path", value_name = "CHANNEL=PATH", value_parser = parse_channel_path)]
    pub paths: Vec<(Channel, String)>,
    /// Directory for session kill files (empty resets to the default).
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ConfigArgs {
    fn has_changes(&self) -> bool {
        self.channel.is_some()
            || self.handle.is_some()
            || self.interval.is_some()
            || self.show_all.is_some()
            || !self.paths.is_empty()
            || self.output_dir.is_some()
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let settings = ConfigHandle::new(load_config().context("failed to load settings")?);

    if args.has_changes() {
        settings.update(|config| apply_changes(config, &args));
        let path = settings.save().context("failed to save settings")?;
        eprintln!("Saved {}", path.display());
    }

    show(&settings.current())
}

fn apply_changes(config: &mut MonitorConfig, args: &ConfigArgs) {
    if let Some(channel) = args.channel {
        config.scan.channel = channel;
    }
    if let Some(handle) = &args.handle {
        config.scan.handle = handle.trim().to_string();
    }
    if let Some(interval) = args.interval {
        config.scan.interval_secs = interval;
    }
    if let Some(show_all) = args.show_all {
        config.scan.show_all = show_all;
    }
    for (channel, path) in &args.paths {
        config.paths.set(*channel, path.clone());
    }
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.trim().to_string();
    }
}

fn show(config: &MonitorConfig) -> Result<()> {
    let file = config_path().context("failed to locate the settings file")?;
    let output_dir = resolve_output_dir(config)?;

    println!("Settings file: {}", file.display());
    println!();
    println!("channel       = {}", config.scan.channel);
    println!("handle        = {}", config.scan.handle);
    println!("interval_secs = {}", config.scan.interval_secs);
    println!("show_all      = {}", config.scan.show_all);
    println!("event_marker  = {}", config.scan.event_marker);
    println!("output_dir    = {}", output_dir.display());
    println!();
    println!("Log paths:");
    for channel in Channel::ALL {
        let selected = if channel == config.scan.channel { "*" } else { " " };
        println!("{selected} {:<12} {}", channel.as_str(), config.paths.get(channel));
    }

    if let Err(e) = config.validate() {
        println!();
        println!("Scanning is not possible yet: {e}");
    }
    Ok(())
}

fn parse_channel_path(raw: &str) -> Result<(Channel, String), String> {
    let (channel, path) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CHANNEL=PATH, got {raw:?}"))?;
    let channel: Channel = channel.parse().map_err(|e| format!("{e}"))?;
    Ok((channel, path.trim().to_string()))
}
