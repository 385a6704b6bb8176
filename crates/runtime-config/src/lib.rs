//! Shared monitor configuration types.
//!
//! `sckm-daemon` loads and persists `sckm.toml` using these types and the CLI
//! edits them through its `config` subcommand. Path expansion and the
//! per-user file location live in the daemon crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Canonical config file name.
pub const CONFIG_FILE_NAME: &str = "sckm.toml";

/// Default seconds between two scans of the log.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;

/// Smallest accepted scan interval.
pub const MIN_INTERVAL_SECS: u64 = 1;

/// Marker written by the game on actor death lines.
pub const DEFAULT_EVENT_MARKER: &str = "<Actor Death>";
const INSTALL_ROOT: &str = r"C:\Program Files\Roberts Space Industries\StarCitizen";

/// Top-level monitor configuration (persisted as `sckm.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MonitorConfig {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub paths: ChannelPaths,
    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanSettings {
    #[serde(default)]
    pub channel: Channel,
    /// In-game handle whose deaths are tracked.
    #[serde(default)]
    pub handle: String,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Also show NPC, environmental and self-inflicted deaths.
    #[serde(default)]
    pub show_all: bool,
    #[serde(default = "default_event_marker")]
    pub event_marker: String,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            channel: Channel::default(),
            handle: String::new(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            show_all: false,
            event_marker: default_event_marker(),
        }
    }
}

/// Log file location per game channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelPaths {
    #[serde(default = "default_live_path")]
    pub live: String,
    #[serde(default = "default_ptu_path")]
    pub ptu: String,
    #[serde(default = "default_eptu_path")]
    pub eptu: String,
    #[serde(default = "default_hotfix_path")]
    pub hotfix: String,
    #[serde(default = "default_tech_preview_path")]
    pub tech_preview: String,
    #[serde(default)]
    pub custom: String,
}

impl Default for ChannelPaths {
    fn default() -> Self {
        Self {
            live: default_live_path(),
            ptu: default_ptu_path(),
            eptu: default_eptu_path(),
            hotfix: default_hotfix_path(),
            tech_preview: default_tech_preview_path(),
            custom: String::new(),
        }
    }
}

impl ChannelPaths {
    pub fn get(&self, channel: Channel) -> &str {
        match channel {
            Channel::Live | Channel::Unknown => &self.live,
            Channel::Ptu => &self.ptu,
            Channel::Eptu => &self.eptu,
            Channel::Hotfix => &self.hotfix,
            Channel::TechPreview => &self.tech_preview,
            Channel::Custom => &self.custom,
        }
    }

    pub fn set(&mut self, channel: Channel, path: impl Into<String>) {
        let slot = match channel {
            Channel::Live | Channel::Unknown => &mut self.live,
            Channel::Ptu => &mut self.ptu,
            Channel::Eptu => &mut self.eptu,
            Channel::Hotfix => &mut self.hotfix,
            Channel::TechPreview => &mut self.tech_preview,
            Channel::Custom => &mut self.custom,
        };
        *slot = path.into();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct OutputSettings {
    /// Directory for per-session kill files. Empty means the platform data dir.
    #[serde(default)]
    pub dir: String,
}

/// Game build variant; each has its own log file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    #[default]
    Live,
    Ptu,
    Eptu,
    Hotfix,
    #[serde(alias = "TECH-PREVIEW")]
    TechPreview,
    #[serde(alias = "Custom")]
    Custom,
    /// Unknown values are normalized by compatibility fallbacks.
    #[serde(other)]
    Unknown,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Live,
        Channel::Ptu,
        Channel::Eptu,
        Channel::Hotfix,
        Channel::TechPreview,
        Channel::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Live => "LIVE",
            Self::Ptu => "PTU",
            Self::Eptu => "EPTU",
            Self::Hotfix => "HOTFIX",
            Self::TechPreview => "TECH_PREVIEW",
            Self::Custom => "CUSTOM",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Channel::ALL
            .into_iter()
            .find(|channel| channel.as_str() == normalized)
            .ok_or_else(|| ConfigError::UnknownChannel(s.to_string()))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("no log file path configured for channel {channel}")]
    EmptyPath { channel: Channel },
    #[error("no player handle configured")]
    EmptyHandle,
    #[error("unknown channel {0:?} (expected LIVE, PTU, EPTU, HOTFIX, TECH_PREVIEW or CUSTOM)")]
    UnknownChannel(String),
}

impl MonitorConfig {
    /// Raw (unexpanded) log path of the selected channel.
    pub fn log_path(&self) -> &str {
        self.paths.get(self.scan.channel)
    }

    /// Interval between scans, never shorter than [`MIN_INTERVAL_SECS`].
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.scan.interval_secs.max(MIN_INTERVAL_SECS))
    }

    /// Check that a scan can start with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_path().trim().is_empty() {
            return Err(ConfigError::EmptyPath {
                channel: self.scan.channel,
            });
        }
        if self.scan.handle.trim().is_empty() {
            return Err(ConfigError::EmptyHandle);
        }
        Ok(())
    }
}

// ── Serde default functions ──

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}
fn default_event_marker() -> String {
    DEFAULT_EVENT_MARKER.to_string()
}
fn default_live_path() -> String {
    channel_install_path("LIVE")
}
fn default_ptu_path() -> String {
    channel_install_path("PTU")
}
fn default_eptu_path() -> String {
    channel_install_path("EPTU")
}
fn default_hotfix_path() -> String {
    channel_install_path("HOTFIX")
}
fn default_tech_preview_path() -> String {
    channel_install_path("TECH-PREVIEW")
}

fn channel_install_path(dir: &str) -> String {
    format!(r"{INSTALL_ROOT}\{dir}\game.log")
}

/// Apply compatibility fallbacks after loading raw TOML.
/// Returns true when any field was updated.
pub fn apply_compat_fallbacks(config: &mut MonitorConfig) -> bool {
    let mut changed = false;

    if config.scan.channel == Channel::Unknown {
        config.scan.channel = Channel::Live;
        changed = true;
    }

    if config.scan.interval_secs < MIN_INTERVAL_SECS {
        config.scan.interval_secs = MIN_INTERVAL_SECS;
        changed = true;
    }

    if config.scan.event_marker.trim().is_empty() {
        config.scan.event_marker = default_event_marker();
        changed = true;
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_marker_matches_parser() {
        assert_eq!(DEFAULT_EVENT_MARKER, sckm_core::DEFAULT_EVENT_MARKER);
        assert_eq!(
            MonitorConfig::default().scan.event_marker,
            sckm_core::KillEventParser::default().marker()
        );
    }

    #[test]
    fn defaults_are_stable() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.scan.channel, Channel::Live);
        assert_eq!(cfg.scan.handle, "");
        assert_eq!(cfg.scan.interval_secs, 60);
        assert!(!cfg.scan.show_all);
        assert_eq!(cfg.scan.event_marker, "<Actor Death>");
        assert_eq!(
            cfg.paths.live,
            r"C:\Program Files\Roberts Space Industries\StarCitizen\LIVE\game.log"
        );
        assert_eq!(
            cfg.paths.tech_preview,
            r"C:\Program Files\Roberts Space Industries\StarCitizen\TECH-PREVIEW\game.log"
        );
        assert_eq!(cfg.paths.custom, "");
        assert_eq!(cfg.output.dir, "");
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
[scan]
handle = "Alice"

[paths]
ptu = "/games/ptu/game.log"
"#,
        )
        .expect("parse toml");

        assert_eq!(cfg.scan.handle, "Alice");
        assert_eq!(cfg.scan.interval_secs, 60);
        assert_eq!(cfg.paths.ptu, "/games/ptu/game.log");
        assert_eq!(cfg.paths.live, default_live_path());
    }

    #[test]
    fn channel_compat_aliases_are_accepted() {
        let cfg: MonitorConfig = toml::from_str(
            r#"
[scan]
channel = "TECH-PREVIEW"
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.scan.channel, Channel::TechPreview);

        let cfg: MonitorConfig = toml::from_str(
            r#"
[scan]
channel = "Custom"
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.scan.channel, Channel::Custom);
    }

    #[test]
    fn apply_compat_fallbacks_normalizes_bad_values() {
        let mut cfg: MonitorConfig = toml::from_str(
            r#"
[scan]
channel = "NIGHTLY"
interval_secs = 0
event_marker = ""
"#,
        )
        .expect("parse toml");
        assert_eq!(cfg.scan.channel, Channel::Unknown);

        assert!(apply_compat_fallbacks(&mut cfg));
        assert_eq!(cfg.scan.channel, Channel::Live);
        assert_eq!(cfg.scan.interval_secs, 1);
        assert_eq!(cfg.scan.event_marker, "<Actor Death>");
    }

    #[test]
    fn apply_compat_fallbacks_is_noop_for_modern_values() {
        let mut cfg = MonitorConfig::default();
        let before = cfg.clone();
        assert!(!apply_compat_fallbacks(&mut cfg));
        assert_eq!(cfg, before);
    }

    #[test]
    fn channel_round_trips_through_toml() {
        for channel in Channel::ALL {
            let mut cfg = MonitorConfig::default();
            cfg.scan.channel = channel;
            let encoded = toml::to_string(&cfg).expect("serialize config");
            assert!(encoded.contains(&format!("channel = \"{channel}\"")));
            let decoded: MonitorConfig = toml::from_str(&encoded).expect("parse config");
            assert_eq!(decoded.scan.channel, channel);
        }
    }

    #[test]
    fn channel_from_str_is_lenient() {
        assert_eq!("live".parse::<Channel>(), Ok(Channel::Live));
        assert_eq!("tech-preview".parse::<Channel>(), Ok(Channel::TechPreview));
        assert_eq!(" Custom ".parse::<Channel>(), Ok(Channel::Custom));
        assert_eq!(
            "nightly".parse::<Channel>(),
            Err(ConfigError::UnknownChannel("nightly".to_string()))
        );
    }

    #[test]
    fn log_path_follows_selected_channel() {
        let mut cfg = MonitorConfig::default();
        cfg.paths.set(Channel::Custom, "/tmp/game.log");
        cfg.scan.channel = Channel::Custom;
        assert_eq!(cfg.log_path(), "/tmp/game.log");

        cfg.scan.channel = Channel::Hotfix;
        assert_eq!(cfg.log_path(), default_hotfix_path());
    }

    #[test]
    fn validate_requires_path_and_handle() {
        let mut cfg = MonitorConfig::default();
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyHandle));

        cfg.scan.handle = "Alice".to_string();
        assert_eq!(cfg.validate(), Ok(()));

        cfg.scan.channel = Channel::Custom;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::EmptyPath {
                channel: Channel::Custom
            })
        );

        cfg.paths.custom = "   ".to_string();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn interval_is_clamped() {
        let mut cfg = MonitorConfig::default();
        cfg.scan.interval_secs = 0;
        assert_eq!(cfg.interval(), Duration::from_secs(1));
        cfg.scan.interval_secs = 5;
        assert_eq!(cfg.interval(), Duration::from_secs(5));
    }
}
