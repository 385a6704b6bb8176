pub mod event;
pub mod extract;
pub mod filter;
pub mod parse;

pub use event::KillEvent;
pub use filter::DisplayFilter;
pub use parse::{KillEventParser, ParseError, DEFAULT_EVENT_MARKER};

#[cfg(any(test, feature = "testing"))]
pub mod testing;
