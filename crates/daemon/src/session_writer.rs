use crate::error::SessionWriteError;
use chrono::{DateTime, Local};
use sckm_core::KillEvent;
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout embedded in session file names (`yyMMdd-HHmmss`).
pub const SESSION_TAG_FORMAT: &str = "%y%m%d-%H%M%S";

/// One continuous run of the scan loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSession {
    started_at: DateTime<Local>,
    tag: String,
}

impl ScanSession {
    /// Start a session now.
    pub fn start() -> Self {
        Self::started_at(Local::now())
    }

    pub fn started_at(started_at: DateTime<Local>) -> Self {
        let tag = started_at.format(SESSION_TAG_FORMAT).to_string();
        Self { started_at, tag }
    }

    pub fn start_time(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Session start formatted for file names, e.g. `250614-193045`.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// Appends each newly found kill to the session's text file.
#[derive(Debug, Clone)]
pub struct SessionWriter {
    dir: PathBuf,
}

impl SessionWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File that collects every kill of the session tagged `session_tag`.
    pub fn file_path(&self, session_tag: &str) -> PathBuf {
        self.dir.join(format!("kill-events-{session_tag}.txt"))
    }

    /// Append one record for `event`.
    pub fn write(&self, event: &KillEvent, session_tag: &str) -> Result<(), SessionWriteError> {
        let path = self.file_path(session_tag);
        let io_err = |source: std::io::Error| SessionWriteError {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(io_err)?;
        file.write_all(format_record(event).as_bytes())
            .map_err(io_err)?;
        Ok(())
    }
}

/// Display block plus the weapon class, followed by a blank separator line.
pub fn format_record(event: &KillEvent) -> String {
    let mut record = String::new();
    let _ = writeln!(record, "{event}");
    let _ = writeln!(record, "Weapon Class = {}", event.weapon_class);
    record.push('\n');
    record
}
