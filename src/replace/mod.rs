pub mod fifo;
pub mod lru;
pub mod optimal;

use std::{fmt, str::FromStr};

use serde::Serialize;

use crate::{error::SimError, frames::FrameTable, trace::Page};

/// Victim selection for a full frame table.
///
/// `victim` is only called when every slot is occupied. `refs` is the whole
/// reference sequence and `at` the position of the faulting reference, so
/// policies may look backward (`refs[..at]`) or forward (`refs[at + 1..]`).
pub trait Replace {
    /// A previously empty slot was filled.
    fn on_fill(&mut self, _slot: usize) {}

    fn victim(&mut self, frames: &FrameTable, refs: &[Page], at: usize) -> usize;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Policy {
    #[serde(rename = "FIFO")]
    Fifo,
    #[serde(rename = "LRU")]
    Lru,
    Optimal,
}

impl Policy {
    pub const ALL: [Policy; 3] = [Policy::Fifo, Policy::Lru, Policy::Optimal];

    pub fn name(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO",
            Policy::Lru => "LRU",
            Policy::Optimal => "Optimal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Policy::Fifo => "FIFO replaces the page that has been in memory for the longest time, regardless of how frequently or recently it is used.",
            Policy::Lru => "LRU replaces the page that has not been used for the longest period of time in the past.",
            Policy::Optimal => "Optimal replaces the page that will not be used for the longest time in the future.",
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fifo" => Ok(Policy::Fifo),
            "lru" => Ok(Policy::Lru),
            "optimal" | "opt" | "min" => Ok(Policy::Optimal),
            _ => Err(SimError::UnknownPolicy(s.to_string())),
        }
    }
}
