use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::deque::{Injector, Steal};
use crossbeam::utils::Backoff;
use grid_search_core::{Grid, GridError, GridNode, NodeId, PathError};
use thiserror::Error;
use tracing::debug;

/// Tuning for [`guided_search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub workers: usize,
    /// Frontier buckets by distance to the goal; bucket 0 is nearest.
    pub priorities: usize,
    /// Nodes one worker expands from a seed before returning the rest.
    pub threshold: usize,
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub found: bool,
    /// Nodes taken off a frontier and expanded.
    pub expanded: usize,
    /// Nodes whose parent slot was set, start included.
    pub claimed: usize,
    /// Start-first path, present when the goal was won.
    pub path: Option<Vec<NodeId>>,
    pub elapsed: Duration,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("grid still holds {0} claimed nodes from a previous search")]
    Dirty(usize),
}

/// Shared state of one search: bucketed frontier plus completion flags.
struct Frontier<'g> {
    grid: &'g Grid,
    goal: &'g GridNode,
    buckets: Vec<Injector<NodeId>>,
    scale: f64,
    threshold: usize,
    /// Nodes queued in a bucket or held as a worker's seed.
    pending: AtomicUsize,
    found: AtomicBool,
    expanded: AtomicUsize,
}

impl<'g> Frontier<'g> {
    fn bucket_of(&self, node: &GridNode) -> usize {
        let last = self.buckets.len() - 1;
        let scaled = node.distance_to(self.goal) / self.scale * last as f64;
        (scaled as usize).min(last)
    }

    fn push(&self, node: &GridNode) {
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.buckets[self.bucket_of(node)].push(node.id());
    }

    /// Take a node from the nearest non-empty bucket.
    fn pop(&self) -> Option<NodeId> {
        for bucket in &self.buckets {
            loop {
                match bucket.steal() {
                    Steal::Success(id) => return Some(id),
                    Steal::Empty => break,
                    Steal::Retry => continue,
                }
            }
        }
        None
    }

    fn run_worker(&self, worker: usize) {
        let backoff = Backoff::new();
        let mut expanded = 0usize;

        while !self.found.load(Ordering::Acquire) {
            let Some(seed) = self.pop() else {
                if self.pending.load(Ordering::SeqCst) == 0 {
                    break;
                }
                backoff.snooze();
                continue;
            };
            backoff.reset();
            expanded += self.expand(seed);
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }

        self.expanded.fetch_add(expanded, Ordering::Relaxed);
        debug!(worker, expanded, "worker finished");
    }

    /// Breadth-first from `seed` for up to `threshold` expansions. Whatever
    /// is still queued afterwards goes back to the shared buckets.
    fn expand(&self, seed: NodeId) -> usize {
        let mut local = VecDeque::from([seed]);
        let mut count = 0;

        while count < self.threshold {
            let Some(current) = local.pop_front() else {
                break;
            };
            let Some(node) = self.grid.node(current) else {
                continue;
            };
            count += 1;

            for &next in node.neighbors() {
                let Some(neighbor) = self.grid.node(next) else {
                    continue;
                };
                if !neighbor.attempt_claim(current) {
                    continue;
                }
                if next == self.goal.id() {
                    self.found.store(true, Ordering::Release);
                    return count;
                }
                local.push_back(next);
            }
        }

        for id in local {
            if let Some(node) = self.grid.node(id) {
                self.push(node);
            }
        }
        count
    }
}

/// Race `config.workers` threads from `start` toward `goal`.
///
/// Every node is expanded by whichever worker won its claim, so the parent
/// chain from `goal` is a valid path but not necessarily a shortest one.
/// The grid must be unclaimed on entry; call [`Grid::reset`] between runs.
pub fn guided_search(
    grid: &Grid,
    start: NodeId,
    goal: NodeId,
    config: &SearchConfig,
) -> Result<SearchOutcome, SearchError> {
    let start_node = grid.node(start).ok_or(GridError::UnknownNode(start))?;
    let goal_node = grid.node(goal).ok_or(GridError::UnknownNode(goal))?;

    let dirty = grid.claimed_count();
    if dirty > 0 {
        return Err(SearchError::Dirty(dirty));
    }

    let t = Instant::now();
    grid.mark_root(start)?;

    let frontier = Frontier {
        grid,
        goal: goal_node,
        buckets: (0..config.priorities.max(1)).map(|_| Injector::new()).collect(),
        scale: start_node.distance_to(goal_node).max(1.0),
        threshold: config.threshold.max(1),
        pending: AtomicUsize::new(0),
        found: AtomicBool::new(start == goal),
        expanded: AtomicUsize::new(0),
    };
    frontier.push(start_node);

    thread::scope(|s| {
        for worker in 0..config.workers.max(1) {
            let frontier = &frontier;
            s.spawn(move || frontier.run_worker(worker));
        }
    });

    // Joined: every claim made by the workers is visible from here on.
    let found = frontier.found.load(Ordering::Acquire);
    let path = if found {
        Some(grid.path_to(start, goal)?)
    } else {
        None
    };

    Ok(SearchOutcome {
        found,
        expanded: frontier.expanded.load(Ordering::Relaxed),
        claimed: grid.claimed_count(),
        path,
        elapsed: t.elapsed(),
    })
}
