use crate::error::ConfigFileError;
use directories::ProjectDirs;
use sckm_runtime_config::{apply_compat_fallbacks, MonitorConfig, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};
use tokio::sync::watch;
use tracing::{info, warn};

fn project_dirs() -> Result<ProjectDirs, ConfigFileError> {
    ProjectDirs::from("", "", "sc-kill-monitor").ok_or(ConfigFileError::NoHomeDir)
}

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf, ConfigFileError> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

/// Get the monitor config file path
pub fn config_path() -> Result<PathBuf, ConfigFileError> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Directory that receives session kill files when none is configured.
pub fn default_output_dir() -> Result<PathBuf, ConfigFileError> {
    Ok(project_dirs()?.data_dir().join("sessions"))
}

/// Load the monitor config from the per-user location.
pub fn load_config() -> Result<MonitorConfig, ConfigFileError> {
    load_config_from(&config_path()?)
}

/// Load a monitor config file. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<MonitorConfig, ConfigFileError> {
    if !path.exists() {
        return Ok(MonitorConfig::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: MonitorConfig =
        toml::from_str(&content).map_err(|source| ConfigFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    if apply_compat_fallbacks(&mut config) {
        warn!(
            "Config at {} had invalid values, using fallbacks",
            path.display()
        );
    }
    Ok(config)
}

/// Persist the monitor config to the per-user location.
pub fn save_config(config: &MonitorConfig) -> Result<PathBuf, ConfigFileError> {
    let path = config_path()?;
    save_config_to(&path, config)?;
    Ok(path)
}

pub fn save_config_to(path: &Path, config: &MonitorConfig) -> Result<(), ConfigFileError> {
    let write_err = |source: std::io::Error| ConfigFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(write_err)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(write_err)?;
    info!("Config written: {}", path.display());
    Ok(())
}

/// Expand `~` and environment variables in a configured path.
pub fn expand_path(raw: &str) -> PathBuf {
    let raw = raw.trim();
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            warn!("Could not expand {raw:?} ({e}), using it verbatim");
            PathBuf::from(shellexpand::tilde(raw).as_ref())
        }
    }
}

/// Log file of the selected channel, expanded.
pub fn resolve_log_path(config: &MonitorConfig) -> PathBuf {
    expand_path(config.log_path())
}

/// Session output directory: the configured one, else the platform default.
pub fn resolve_output_dir(config: &MonitorConfig) -> Result<PathBuf, ConfigFileError> {
    if config.output.dir.trim().is_empty() {
        default_output_dir()
    } else {
        Ok(expand_path(&config.output.dir))
    }
}

/// Injected configuration provider with change notification.
///
/// Readers hold a [`watch::Receiver`] from [`ConfigHandle::subscribe`] and see
/// every update made through [`ConfigHandle::update`].
#[derive(Debug)]
pub struct ConfigHandle {
    tx: watch::Sender<MonitorConfig>,
}

impl ConfigHandle {
    pub fn new(config: MonitorConfig) -> Self {
        let (tx, _rx) = watch::channel(config);
        Self { tx }
    }

    /// Snapshot of the current configuration.
    pub fn current(&self) -> MonitorConfig {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MonitorConfig> {
        self.tx.subscribe()
    }

    /// Mutate the configuration and notify every subscriber.
    pub fn update(&self, f: impl FnOnce(&mut MonitorConfig)) {
        self.tx.send_modify(f);
    }

    /// Persist the current configuration to the per-user location.
    pub fn save(&self) -> Result<PathBuf, ConfigFileError> {
        save_config(&self.current())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        save_config_to(path, &self.current())
    }
}
