use std::iter;

use serde::Serialize;

use crate::{replace::Policy, trace::Page};

/// Summary of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimStats {
    pub policy: Policy,
    pub frames: usize,
    pub references: usize,
    pub faults: usize,
    pub hits: usize,
    /// `None` when the run had no references.
    pub fault_rate: Option<f64>,
}

impl SimStats {
    pub fn new(policy: Policy, frames: usize, references: usize, faults: usize) -> Self {
        let fault_rate = (references > 0).then(|| faults as f64 / references as f64);
        SimStats {
            policy,
            frames,
            references,
            faults,
            hits: references - faults,
            fault_rate,
        }
    }
}

/// Fixed set of physical frames. A slot is either empty or holds one page,
/// and no page is resident in two slots at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameTable {
    slots: Vec<Option<Page>>,
}

impl FrameTable {
    pub fn new(n_frames: usize) -> Self {
        assert!(n_frames > 0);
        FrameTable {
            slots: iter::repeat_with(|| None).take(n_frames).collect(),
        }
    }

    pub fn get(&self, slot: usize) -> Option<&Page> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Slot currently holding `page`, if resident.
    pub fn find(&self, page: &Page) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|p| p == page))
    }

    /// Lowest-index empty slot.
    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Occupied slots in slot-index order.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &Page)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, p)| p.as_ref().map(|p| (slot, p)))
    }

    /// Puts `page` in `slot`, returning whatever was there before.
    pub fn place(&mut self, slot: usize, page: Page) -> Option<Page> {
        debug_assert!(self.find(&page).is_none(), "page {page} already resident");
        self.slots[slot].replace(page)
    }

    pub fn snapshot(&self) -> Vec<Option<Page>> {
        self.slots.clone()
    }
}
