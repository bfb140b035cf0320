//! Plain-text rendering of simulation results for the command line.
//!
//! The map is laid out vertically: one column per reference, one row per
//! frame slot. The slot filled on a fault is bracketed.

use std::fmt::Write;

use crate::{
    sim::{Simulation, Sweep},
    trace::Page,
};

const EMPTY_SLOT: &str = "-";

fn cell_width(sim: &Simulation) -> usize {
    sim.steps
        .iter()
        .map(|s| s.page.as_str().len())
        .max()
        .unwrap_or(1)
        .max(EMPTY_SLOT.len())
        + 2
}

pub fn frame_map(sim: &Simulation) -> String {
    let width = cell_width(sim);
    let mut out = String::new();

    let _ = write!(out, "{:<6}|", "ref");
    for step in &sim.steps {
        let _ = write!(out, " {:^width$}", step.page.as_str());
    }
    out.push('\n');
    let rule = format!("{}+{}\n", "-".repeat(6), "-".repeat(sim.steps.len() * (width + 1)));
    out.push_str(&rule);

    for slot in 0..sim.frames {
        let _ = write!(out, "{:<6}|", format!("#{slot}"));
        for step in &sim.steps {
            let val = step.frames[slot].as_ref().map_or(EMPTY_SLOT, Page::as_str);
            let cell = if step.replaced_idx == Some(slot) {
                format!("[{val}]")
            } else {
                val.to_string()
            };
            let _ = write!(out, " {cell:^width$}");
        }
        out.push('\n');
    }

    out.push_str(&rule);
    let _ = write!(out, "{:<6}|", "");
    for step in &sim.steps {
        let _ = write!(out, " {:^width$}", if step.is_fault { "F" } else { "." });
    }
    out.push('\n');
    out
}

pub fn summary(sim: &Simulation) -> String {
    let rate = match sim.fault_rate() {
        Some(rate) => format!("{:.1}%", rate * 100.0),
        None => "n/a".to_string(),
    };
    format!(
        "Total page faults: {}\nPage fault rate: {}\n",
        sim.faults, rate
    )
}

pub fn report(sim: &Simulation, show_map: bool) -> String {
    let mut out = format!("== {} ({} frames)\n", sim.policy, sim.frames);
    out.push_str(sim.policy.description());
    out.push_str("\n\n");
    if show_map && !sim.steps.is_empty() {
        out.push_str(&frame_map(sim));
        out.push('\n');
    }
    out.push_str(&summary(sim));
    out
}

pub fn sweep_table(sweep: &Sweep) -> String {
    let anomalies = sweep.anomalies();
    let mut out = format!("== {} fault counts by frame count\n", sweep.policy);
    for &(frames, faults) in &sweep.faults {
        let _ = write!(out, "{frames:>4} frames: {faults:>5} faults");
        if anomalies.contains(&frames) {
            out.push_str("  <- Belady's anomaly");
        }
        out.push('\n');
    }
    out
}
