use std::collections::VecDeque;

use crate::{frames::FrameTable, trace::Page};

use super::Replace;

/// First in, first out. Tracks slots in the order they were last filled.
pub struct Fifo {
    fill_order: VecDeque<usize>,
}

impl Fifo {
    pub fn new(n_frames: usize) -> Self {
        Fifo {
            fill_order: VecDeque::with_capacity(n_frames),
        }
    }
}

impl Replace for Fifo {
    fn on_fill(&mut self, slot: usize) {
        self.fill_order.push_back(slot);
    }

    fn victim(&mut self, _frames: &FrameTable, _refs: &[Page], _at: usize) -> usize {
        // Every occupied slot was pushed on fill, so the queue is never empty here
        let oldest = self.fill_order.pop_front().unwrap_or(0);
        self.fill_order.push_back(oldest);
        oldest
    }
}
