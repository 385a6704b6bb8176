use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Date format used in the rendered kill block (`dd.MM.yy HH:mm:ss:SSS`).
pub const KILL_DATE_FORMAT: &str = "%d.%m.%y %H:%M:%S:%3f";

/// A single player death recovered from the game log.
///
/// Equality and hashing cover every field, the timestamp's offset included:
/// the same instant written with two different offsets is two events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KillEvent {
    pub timestamp: DateTime<FixedOffset>,
    pub killed_player: String,
    pub killer: String,
    pub weapon: String,
    /// Empty when the line carries no `[Class …]` token.
    #[serde(default)]
    pub weapon_class: String,
    pub damage_type: String,
    pub zone: String,
}

impl KillEvent {
    fn offset_secs(&self) -> i32 {
        self.timestamp.offset().local_minus_utc()
    }

    /// Kill date in UTC, formatted for display.
    pub fn kill_date(&self) -> String {
        self.timestamp
            .with_timezone(&Utc)
            .format(KILL_DATE_FORMAT)
            .to_string()
    }
}

impl PartialEq for KillEvent {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
            && self.offset_secs() == other.offset_secs()
            && self.killed_player == other.killed_player
            && self.killer == other.killer
            && self.weapon == other.weapon
            && self.weapon_class == other.weapon_class
            && self.damage_type == other.damage_type
            && self.zone == other.zone
    }
}

impl Eq for KillEvent {}

impl Hash for KillEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.timestamp.hash(state);
        self.offset_secs().hash(state);
        self.killed_player.hash(state);
        self.killer.hash(state);
        self.weapon.hash(state);
        self.weapon_class.hash(state);
        self.damage_type.hash(state);
        self.zone.hash(state);
    }
}

impl fmt::Display for KillEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kill Date = {} UTC", self.kill_date())?;
        writeln!(f, "Killed Player = {}", self.killed_player)?;
        writeln!(f, "Zone = {}", self.zone)?;
        writeln!(f, "Killer = {}", self.killer)?;
        writeln!(f, "Used Method/Weapon = {}", self.weapon)?;
        write!(f, "Damage Type = {}", self.damage_type)
    }
}
