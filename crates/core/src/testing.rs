use crate::KillEvent;
use chrono::DateTime;

/// A `Game.log` actor death line in the layout the game writes.
pub fn kill_line(timestamp: &str, victim: &str, killer: &str) -> String {
    format!(
        "<{timestamp}> [Notice] <Actor Death> CActor::Kill: '{victim}' [200012345] \
         in zone 'Stanton' killed by '{killer}' [200054321] using 'Arrowhead' \
         [Class W_Rifle_01] with damage type 'Bullet' from direction x: 0.1, y: 0.2, z: 0.3 \
         [Team_ActorTech][Actor]"
    )
}

/// Event matching [`kill_line`] with the same arguments.
pub fn event_at(timestamp: &str, victim: &str, killer: &str) -> KillEvent {
    KillEvent {
        timestamp: DateTime::parse_from_rfc3339(timestamp)
            .unwrap_or_else(|e| panic!("bad test timestamp {timestamp}: {e}")),
        killed_player: victim.to_string(),
        killer: killer.to_string(),
        weapon: "Arrowhead".to_string(),
        weapon_class: "W_Rifle_01".to_string(),
        damage_type: "Bullet".to_string(),
        zone: "Stanton".to_string(),
    }
}

/// A non-event line as found between actor deaths.
pub fn noise_line(timestamp: &str) -> String {
    format!("<{timestamp}> [Notice] <Vehicle Control Flow> local client node granted control")
}
