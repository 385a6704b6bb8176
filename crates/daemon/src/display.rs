use sckm_core::KillEvent;
use std::io::Write;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Events that became visible during one poll cycle, in store order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBatch {
    pub cycle: u64,
    pub events: Vec<KillEvent>,
}

/// Receives display batches on the context that owns the display.
pub trait DisplaySink {
    fn show(&mut self, batch: &DisplayBatch);
}

/// Renders each event as its text block, separated by blank lines.
pub struct TextBlockSink<W: Write> {
    out: W,
    shown: usize,
}

impl<W: Write> TextBlockSink<W> {
    pub fn new(out: W) -> Self {
        Self { out, shown: 0 }
    }

    /// Number of events rendered so far.
    pub fn shown(&self) -> usize {
        self.shown
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DisplaySink for TextBlockSink<W> {
    fn show(&mut self, batch: &DisplayBatch) {
        for event in &batch.events {
            if let Err(e) = writeln!(self.out, "{event}\n") {
                warn!("Failed to render kill event: {e}");
                return;
            }
            self.shown += 1;
        }
        if let Err(e) = self.out.flush() {
            warn!("Failed to flush display: {e}");
        }
    }
}

/// Apply batches to `sink` in the order the worker sent them, until every
/// sender is gone. Returns how many batches were applied.
pub async fn pump<S: DisplaySink + ?Sized>(
    mut rx: mpsc::UnboundedReceiver<DisplayBatch>,
    sink: &mut S,
) -> u64 {
    let mut applied = 0;
    while let Some(batch) = rx.recv().await {
        debug!(
            "Display cycle {}: {} new event(s)",
            batch.cycle,
            batch.events.len()
        );
        sink.show(&batch);
        applied += 1;
    }
    applied
}
