use crate::{frames::FrameTable, trace::Page};

use super::Replace;

/// Belady's optimal (MIN) policy. Needs the full reference sequence up front.
pub struct Optimal {}

impl Optimal {
    pub fn new() -> Self {
        Optimal {}
    }
}

impl Default for Optimal {
    fn default() -> Self {
        Optimal::new()
    }
}

impl Replace for Optimal {
    fn victim(&mut self, frames: &FrameTable, refs: &[Page], at: usize) -> usize {
        let future = refs.get(at + 1..).unwrap_or(&[]);
        let mut victim = 0;
        let mut farthest = None;
        for (slot, page) in frames.occupied() {
            match future.iter().position(|p| p == page) {
                // Never referenced again: lowest such slot wins outright
                None => return slot,
                Some(next_use) => {
                    if farthest.map_or(true, |far| next_use > far) {
                        farthest = Some(next_use);
                        victim = slot;
                    }
                }
            }
        }
        victim
    }
}

#[cfg(test)]
mod tests {
    use crate::trace::parse;

    use super::*;

    fn table(pages: &[&str]) -> FrameTable {
        let mut frames = FrameTable::new(pages.len());
        for (slot, page) in pages.iter().enumerate() {
            frames.place(slot, Page::from(*page));
        }
        frames
    }

    #[test]
    fn page_never_used_again_is_evicted_first() {
        let refs = parse("1,2,3,4,2,1", ",");
        let frames = table(&["1", "2", "3"]);
        assert_eq!(Optimal::new().victim(&frames, &refs, 3), 2);
    }

    #[test]
    fn lowest_slot_among_unused_pages() {
        let refs = parse("1,2,3,4,2", ",");
        let frames = table(&["1", "2", "3"]);
        assert_eq!(Optimal::new().victim(&frames, &refs, 3), 0);
    }

    #[test]
    fn farthest_next_use_otherwise() {
        let refs = parse("1,2,3,4,2,3,1", ",");
        let frames = table(&["1", "2", "3"]);
        assert_eq!(Optimal::new().victim(&frames, &refs, 3), 0);
    }

    #[test]
    fn last_reference_has_empty_future() {
        let refs = parse("1,2,3", ",");
        let frames = table(&["1", "2"]);
        assert_eq!(Optimal::new().victim(&frames, &refs, 2), 0);
    }
}
