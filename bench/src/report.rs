use serde::Serialize;

use crate::search::SearchOutcome;

/// One benchmark run, flattened for printing.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run: usize,
    pub grid_size: u32,
    pub workers: usize,
    pub found: bool,
    pub hops: Option<usize>,
    pub expanded: usize,
    pub claimed: usize,
    pub elapsed_ms: f64,
}

impl RunReport {
    pub fn new(run: usize, grid_size: u32, workers: usize, outcome: &SearchOutcome) -> Self {
        Self {
            run,
            grid_size,
            workers,
            found: outcome.found,
            hops: outcome.path.as_ref().map(|p| p.len() - 1),
            expanded: outcome.expanded,
            claimed: outcome.claimed,
            elapsed_ms: outcome.elapsed.as_secs_f64() * 1000.0,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

pub fn print_header() {
    println!(
        "{:>5} {:>8} {:>6} {:>10} {:>10} {:>10}",
        "run", "found", "hops", "expanded", "claimed", "time"
    );
    println!(
        "{:->5} {:->8} {:->6} {:->10} {:->10} {:->10}",
        "", "", "", "", "", ""
    );
}

pub fn print_row(report: &RunReport) {
    let hops = report
        .hops
        .map(|h| h.to_string())
        .unwrap_or_else(|| "-".into());
    println!(
        "{:>5} {:>8} {:>6} {:>10} {:>10} {:>8.1}ms",
        report.run, report.found, hops, report.expanded, report.claimed, report.elapsed_ms
    );
}
