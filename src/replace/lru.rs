use crate::{frames::FrameTable, trace::Page};

use super::Replace;

/// Least recently used, computed from the reference history rather than a
/// maintained recency list.
pub struct Lru {}

impl Lru {
    pub fn new() -> Self {
        Lru {}
    }
}

impl Default for Lru {
    fn default() -> Self {
        Lru::new()
    }
}

impl Replace for Lru {
    fn victim(&mut self, frames: &FrameTable, refs: &[Page], at: usize) -> usize {
        let past = &refs[..at];
        // min_by_key keeps the first minimum, so ties go to the lowest slot
        frames
            .occupied()
            .map(|(slot, page)| {
                let last_use = past.iter().rposition(|p| p == page);
                (slot, last_use)
            })
            .min_by_key(|&(_slot, last_use)| last_use)
            .map(|(slot, _)| slot)
            .unwrap_or(0)
    }
}
