use anyhow::{Context, Result};
use clap::Args;
use sckm_core::{KillEvent, KillEventParser, DEFAULT_EVENT_MARKER};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// Game log to read.
    pub file: PathBuf,
    /// Only print deaths of this handle.
    #[arg(long)]
    pub handle: Option<String>,
    /// Print one JSON object per line instead of text blocks.
    #[arg(long)]
    pub json: bool,
    /// Line marker that identifies kill events.
    #[arg(long, default_value = DEFAULT_EVENT_MARKER)]
    pub marker: String,
}

pub fn run(args: ParseArgs) -> Result<()> {
    let parser = KillEventParser::new(args.marker.as_str());
    let events = extract_events(&args.file, &parser, args.handle.as_deref())?;
    debug!("{} kill event(s) in {}", events.len(), args.file.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_events(&mut out, &events, args.json)
}

/// Distinct kill events of `path`, newest first.
fn extract_events(
    path: &Path,
    parser: &KillEventParser,
    handle: Option<&str>,
) -> Result<Vec<KillEvent>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes);

    let mut seen = HashSet::new();
    let mut events = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if !parser.is_candidate(line) {
            continue;
        }
        let event = match parser.parse(line) {
            Ok(event) => event,
            Err(e) => {
                warn!("Skipping line {}: {e}", idx + 1);
                continue;
            }
        };
        if handle.is_some_and(|h| h != event.killed_player) {
            continue;
        }
        if seen.insert(event.clone()) {
            events.push(event);
        }
    }

    events.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(events)
}

fn write_events(out: &mut impl Write, events: &[KillEvent], json: bool) -> Result<()> {
    for event in events {
        if json {
            let line = serde_json::to_string(event)?;
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{event}")?;
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}
