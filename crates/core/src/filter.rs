use crate::KillEvent;
use std::collections::HashSet;

/// Killer name fragments that identify NPCs, AI modules and environmental deaths.
pub const NON_PLAYER_MARKERS: &[&str] = &["unknown", "aimodule", "pu_", "npc_", "kopion_"];

/// Whether a kill was caused by the environment, an NPC, or the player themself.
pub fn is_environmental(event: &KillEvent, handle: &str) -> bool {
    if event.killer == handle {
        return true;
    }
    let killer = event.killer.to_lowercase();
    NON_PLAYER_MARKERS
        .iter()
        .any(|marker| killer.contains(marker))
}

/// Decides which stored events are shown, remembering what was shown already
/// so repeated polls only surface new entries.
#[derive(Debug, Default)]
pub struct DisplayFilter {
    displayed: HashSet<KillEvent>,
}

impl DisplayFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `event` for display, recording it when accepted.
    ///
    /// Environmental and self kills pass only with `show_all`; an event is
    /// never accepted twice.
    pub fn should_display(&mut self, event: &KillEvent, handle: &str, show_all: bool) -> bool {
        if self.displayed.contains(event) {
            return false;
        }
        if !show_all && is_environmental(event, handle) {
            return false;
        }
        self.displayed.insert(event.clone());
        true
    }

    /// Newly visible events, in the order given.
    pub fn select<'a>(
        &mut self,
        events: impl IntoIterator<Item = &'a KillEvent>,
        handle: &str,
        show_all: bool,
    ) -> Vec<KillEvent> {
        events
            .into_iter()
            .filter(|event| self.should_display(event, handle, show_all))
            .cloned()
            .collect()
    }

    pub fn displayed_count(&self) -> usize {
        self.displayed.len()
    }
}
