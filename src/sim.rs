//! The paging simulator: walks a reference sequence once, tracking frame
//! occupancy and choosing victims with the selected replacement policy.
//!
//! A run owns all of its state (frame table and policy bookkeeping) and
//! returns it as an immutable trace, so independent runs may execute on
//! separate threads.

use std::panic;

use serde::Serialize;

use crate::{
    error::{Result, SimError},
    frames::{FrameTable, SimStats},
    replace::{fifo::Fifo, lru::Lru, optimal::Optimal, Policy, Replace},
    trace::Page,
};

/// State after processing one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub page: Page,
    /// Frame table snapshot, `None` for empty slots.
    pub frames: Vec<Option<Page>>,
    pub is_fault: bool,
    /// Slot that was filled on a fault. Always `None` on a hit.
    pub replaced_idx: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Simulation {
    pub policy: Policy,
    pub frames: usize,
    pub faults: usize,
    pub steps: Vec<StepRecord>,
}

impl Simulation {
    /// Faults per reference, or `None` for an empty run.
    pub fn fault_rate(&self) -> Option<f64> {
        self.stats().fault_rate
    }

    pub fn stats(&self) -> SimStats {
        SimStats::new(self.policy, self.frames, self.steps.len(), self.faults)
    }
}

/// Converts a user supplied frame count, rejecting anything below one.
pub fn frame_count(n: i64) -> Result<usize> {
    match usize::try_from(n) {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(SimError::InvalidFrameCount(n)),
    }
}

pub fn simulate(refs: &[Page], n_frames: usize, policy: Policy) -> Result<Simulation> {
    if n_frames == 0 {
        return Err(SimError::InvalidFrameCount(0));
    }
    tracing::debug!(%policy, frames = n_frames, references = refs.len(), "starting simulation");

    let (faults, steps) = match policy {
        Policy::Fifo => run(refs, n_frames, Fifo::new(n_frames)),
        Policy::Lru => run(refs, n_frames, Lru::new()),
        Policy::Optimal => run(refs, n_frames, Optimal::new()),
    };

    tracing::debug!(%policy, faults, "finished simulation");
    Ok(Simulation {
        policy,
        frames: n_frames,
        faults,
        steps,
    })
}

fn run<R: Replace>(refs: &[Page], n_frames: usize, mut repl: R) -> (usize, Vec<StepRecord>) {
    let mut frames = FrameTable::new(n_frames);
    let mut faults = 0;
    let mut steps = Vec::with_capacity(refs.len());

    for (at, page) in refs.iter().enumerate() {
        let replaced_idx = if frames.find(page).is_some() {
            None
        } else {
            faults += 1;
            let slot = if let Some(empty) = frames.first_empty() {
                repl.on_fill(empty);
                empty
            } else {
                let victim = repl.victim(&frames, refs, at);
                tracing::trace!(
                    step = at,
                    victim,
                    evicted = ?frames.get(victim),
                    incoming = %page,
                    "evicting"
                );
                victim
            };
            frames.place(slot, page.clone());
            Some(slot)
        };

        steps.push(StepRecord {
            page: page.clone(),
            frames: frames.snapshot(),
            is_fault: replaced_idx.is_some(),
            replaced_idx,
        });
    }

    (faults, steps)
}

/// Runs every policy in `policies` against the same input on its own thread.
/// Results come back in the order the policies were given.
pub fn compare(refs: &[Page], n_frames: usize, policies: &[Policy]) -> Result<Vec<Simulation>> {
    if n_frames == 0 {
        return Err(SimError::InvalidFrameCount(0));
    }
    crossbeam::thread::scope(|scope| {
        let handles = policies
            .iter()
            .map(|&policy| scope.spawn(move |_| simulate(refs, n_frames, policy)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap_or_else(|err| panic::resume_unwind(err)))
            .collect::<Result<Vec<_>>>()
    })
    .unwrap_or_else(|err| panic::resume_unwind(err))
}

/// Fault counts of one policy over a range of frame counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sweep {
    pub policy: Policy,
    /// `(frames, faults)` for frames `1..=max_frames`.
    pub faults: Vec<(usize, usize)>,
}

impl Sweep {
    /// Frame counts that fault more than with one frame fewer (Belady's anomaly).
    pub fn anomalies(&self) -> Vec<usize> {
        self.faults
            .windows(2)
            .filter(|w| w[1].1 > w[0].1)
            .map(|w| w[1].0)
            .collect()
    }
}

pub fn sweep(refs: &[Page], policy: Policy, max_frames: usize) -> Result<Sweep> {
    if max_frames == 0 {
        return Err(SimError::InvalidFrameCount(0));
    }
    let faults = (1..=max_frames)
        .map(|n| simulate(refs, n, policy).map(|sim| (n, sim.faults)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Sweep { policy, faults })
}

#[cfg(test)]
mod tests {
    use crate::trace::parse;

    use super::*;

    const BELADY: &str = "1,2,3,4,1,2,5,1,2,3,4,5";

    fn frames_of(step: &StepRecord) -> Vec<&str> {
        step.frames
            .iter()
            .map(|f| f.as_ref().map_or("-", Page::as_str))
            .collect()
    }

    #[test]
    fn fifo_trace_matches_hand_run() {
        let refs = parse(BELADY, ",");
        let sim = simulate(&refs, 3, Policy::Fifo).unwrap();
        let expected = [
            (["1", "-", "-"], Some(0)),
            (["1", "2", "-"], Some(1)),
            (["1", "2", "3"], Some(2)),
            (["4", "2", "3"], Some(0)),
            (["4", "1", "3"], Some(1)),
            (["4", "1", "2"], Some(2)),
            (["5", "1", "2"], Some(0)),
            (["5", "1", "2"], None),
            (["5", "1", "2"], None),
            (["5", "3", "2"], Some(1)),
            (["5", "3", "4"], Some(2)),
            (["5", "3", "4"], None),
        ];
        assert_eq!(sim.steps.len(), expected.len());
        for (step, (frames, replaced)) in sim.steps.iter().zip(expected) {
            assert_eq!(frames_of(step), frames);
            assert_eq!(step.replaced_idx, replaced);
            assert_eq!(step.is_fault, replaced.is_some());
        }
        assert_eq!(sim.faults, 9);
    }

    #[test]
    fn lru_trace_matches_hand_run() {
        let refs = parse("7,0,1,2,0,3,0,4", ",");
        let sim = simulate(&refs, 3, Policy::Lru).unwrap();
        let last = sim.steps.last().unwrap();
        // 2 0 3 resident before 4 arrives; 2 is least recent
        assert_eq!(frames_of(&sim.steps[6]), ["2", "0", "3"]);
        assert_eq!(frames_of(last), ["4", "0", "3"]);
        assert_eq!(last.replaced_idx, Some(0));
        assert_eq!(sim.faults, 6);
    }

    #[test]
    fn optimal_trace_matches_hand_run() {
        let refs = parse("7,0,1,2,0,3,0,4,2,3,0,3,2", ",");
        let sim = simulate(&refs, 3, Policy::Optimal).unwrap();
        assert_eq!(frames_of(&sim.steps[3]), ["2", "0", "1"]);
        assert_eq!(frames_of(&sim.steps[5]), ["2", "0", "3"]);
        assert_eq!(frames_of(&sim.steps[7]), ["2", "4", "3"]);
        assert_eq!(sim.faults, 7);
    }

    #[test]
    fn hits_report_no_replaced_slot() {
        let refs = parse("a,b,a", ",");
        let sim = simulate(&refs, 2, Policy::Lru).unwrap();
        assert!(!sim.steps[2].is_fault);
        assert_eq!(sim.steps[2].replaced_idx, None);
    }

    #[test]
    fn zero_frames_is_a_configuration_error() {
        let refs = parse("1,2", ",");
        for policy in Policy::ALL {
            assert!(matches!(
                simulate(&refs, 0, policy),
                Err(SimError::InvalidFrameCount(0))
            ));
        }
        assert!(matches!(frame_count(-2), Err(SimError::InvalidFrameCount(-2))));
        assert_eq!(frame_count(4).unwrap(), 4);
    }

    #[test]
    fn empty_input_yields_empty_trace() {
        for policy in Policy::ALL {
            let sim = simulate(&[], 3, policy).unwrap();
            assert_eq!(sim.faults, 0);
            assert!(sim.steps.is_empty());
            assert_eq!(sim.fault_rate(), None);
        }
    }

    #[test]
    fn compare_matches_sequential_runs() {
        let refs = parse(BELADY, ",");
        let sims = compare(&refs, 3, &[Policy::Optimal, Policy::Fifo, Policy::Lru]).unwrap();
        let faults = sims.iter().map(|s| (s.policy, s.faults)).collect::<Vec<_>>();
        assert_eq!(
            faults,
            [(Policy::Optimal, 7), (Policy::Fifo, 9), (Policy::Lru, 10)]
        );
        assert_eq!(sims[1], simulate(&refs, 3, Policy::Fifo).unwrap());
    }

    #[test]
    fn sweep_flags_belady_anomaly_under_fifo() {
        let refs = parse(BELADY, ",");
        let fifo = sweep(&refs, Policy::Fifo, 5).unwrap();
        assert_eq!(fifo.faults[2], (3, 9));
        assert_eq!(fifo.faults[3], (4, 10));
        assert_eq!(fifo.anomalies(), [4]);

        let lru = sweep(&refs, Policy::Lru, 5).unwrap();
        assert!(lru.anomalies().is_empty());
    }
}
