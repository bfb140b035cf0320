//! Page replacement simulator.
//!
//! Replays a reference string against a fixed number of physical frames
//! under FIFO, LRU or Optimal replacement and records the frame contents,
//! hit/fault decision and filled slot for every reference.

pub mod config;
pub mod error;
pub mod frames;
pub mod render;
pub mod replace;
pub mod sim;
pub mod trace;

pub use error::SimError;
pub use frames::SimStats;
pub use replace::Policy;
pub use sim::{compare, simulate, sweep, Simulation, StepRecord, Sweep};
pub use trace::Page;
