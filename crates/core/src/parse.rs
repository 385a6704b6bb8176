use crate::event::KillEvent;
use crate::extract::extract_between;
use chrono::DateTime;
use thiserror::Error;

/// Marker the game writes on every actor death line.
pub const DEFAULT_EVENT_MARKER: &str = "<Actor Death>";

const KILLED_PLAYER_TOKEN: &str = "CActor::Kill: '";
const ZONE_TOKEN: &str = "in zone '";
const KILLER_TOKEN: &str = "killed by '";
const WEAPON_TOKEN: &str = "using '";
const WEAPON_CLASS_TOKEN: &str = "[Class ";
const DAMAGE_TYPE_TOKEN: &str = "with damage type '";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("invalid timestamp {raw:?}: {source}")]
    InvalidTimestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },
}

/// Turns `<Actor Death>` log lines into [`KillEvent`]s.
#[derive(Debug, Clone)]
pub struct KillEventParser {
    marker: String,
}

impl Default for KillEventParser {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_MARKER)
    }
}

impl KillEventParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Whether the line carries the event marker and should be parsed at all.
    pub fn is_candidate(&self, line: &str) -> bool {
        line.contains(self.marker.as_str())
    }

    /// Parse one log line.
    ///
    /// Only the timestamp is mandatory. Every other field falls back to an
    /// empty string when its token is missing.
    pub fn parse(&self, line: &str) -> Result<KillEvent, ParseError> {
        let raw_timestamp = extract_between(line, "<", ">");
        let timestamp =
            DateTime::parse_from_rfc3339(raw_timestamp).map_err(|source| {
                ParseError::InvalidTimestamp {
                    raw: raw_timestamp.to_string(),
                    source,
                }
            })?;

        let field = |token: &str, end: &str| extract_between(line, token, end).to_string();

        Ok(KillEvent {
            timestamp,
            killed_player: field(KILLED_PLAYER_TOKEN, "'"),
            zone: field(ZONE_TOKEN, "'"),
            killer: field(KILLER_TOKEN, "'"),
            weapon: field(WEAPON_TOKEN, "'"),
            weapon_class: field(WEAPON_CLASS_TOKEN, "]"),
            damage_type: field(DAMAGE_TYPE_TOKEN, "'"),
        })
    }
}
