//! Kill monitor scan engine.
//!
//! A [`PollScheduler`] runs one background task per scan session. Each cycle
//! the [`LogScanner`] re-reads the game log, stores and persists the tracked
//! player's new deaths, and the worker hands the newly visible ones to the
//! display over a channel drained by [`display::pump`].

pub mod config;
pub mod display;
pub mod error;
pub mod scanner;
pub mod scheduler;
pub mod session_writer;
pub mod store;

pub use config::ConfigHandle;
pub use display::{DisplayBatch, DisplaySink, TextBlockSink};
pub use error::{ConfigFileError, ScanError, SessionWriteError};
pub use scanner::LogScanner;
pub use scheduler::{PollScheduler, SchedulerError, SchedulerState, SessionSummary};
pub use session_writer::{ScanSession, SessionWriter};
pub use store::EventStore;
