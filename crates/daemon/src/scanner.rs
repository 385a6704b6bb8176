use crate::error::ScanError;
use crate::session_writer::{ScanSession, SessionWriter};
use crate::store::EventStore;
use sckm_core::{KillEvent, KillEventParser};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Reads the game log from the start on every call and records the tracked
/// player's deaths.
///
/// Re-reading the whole file keeps the scanner correct when the game rotates
/// or truncates its log between polls; the store's dedup keeps repeated
/// passes from producing duplicates.
#[derive(Debug, Clone)]
pub struct LogScanner {
    parser: KillEventParser,
    handle: String,
    writer: SessionWriter,
}

impl LogScanner {
    pub fn new(handle: impl Into<String>, parser: KillEventParser, writer: SessionWriter) -> Self {
        Self {
            parser,
            handle: handle.into(),
            writer,
        }
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn writer(&self) -> &SessionWriter {
        &self.writer
    }

    /// One full pass over `path`. Returns how many new events were stored.
    ///
    /// Reads up to the file length seen at open time. The store is re-sorted
    /// even when the pass is cut short by a read error.
    pub fn scan_once(
        &self,
        path: &Path,
        session: &ScanSession,
        store: &mut EventStore,
    ) -> Result<usize, ScanError> {
        let file = File::open(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => ScanError::NotFound(path.to_path_buf()),
            _ => ScanError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let result = self.read_events(file, path, session, store);
        store.sort_newest_first();
        result
    }

    fn read_events(
        &self,
        file: File,
        path: &Path,
        session: &ScanSession,
        store: &mut EventStore,
    ) -> Result<usize, ScanError> {
        let io_err = |source: std::io::Error| ScanError::Io {
            path: path.to_path_buf(),
            source,
        };
        let len = file.metadata().map_err(io_err)?.len();
        let mut reader = BufReader::new(file.take(len));

        let mut buf = Vec::new();
        let mut found = 0;
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).map_err(io_err)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\r', '\n']);
            if !self.parser.is_candidate(line) {
                continue;
            }
            match self.parser.parse(line) {
                Ok(event) => {
                    if self.record(event, session, store) {
                        found += 1;
                    }
                }
                Err(e) => warn!("Skipping kill line ({e}): {line}"),
            }
        }
        Ok(found)
    }

    fn record(&self, event: KillEvent, session: &ScanSession, store: &mut EventStore) -> bool {
        if event.killed_player != self.handle || store.contains(&event) {
            return false;
        }
        if let Err(e) = self.writer.write(&event, session.tag()) {
            error!("{e}");
        }
        info!(
            "New kill event detected: {} killed by {} in {}",
            event.killed_player, event.killer, event.zone
        );
        debug!("Kill event:\n{event}");
        store.insert(event)
    }
}
