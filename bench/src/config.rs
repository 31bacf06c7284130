use clap::Parser;
use thiserror::Error;

use crate::search::SearchConfig;

/// Largest lattice edge length whose node ids still fit a `u32` arena.
pub const MAX_GRID_SIZE: u32 = 1625;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "grid-search-bench",
    about = "Parallel guided search over a pseudo-random 3D lattice"
)]
pub struct Args {
    /// Lattice edge length (the grid has size^3 nodes).
    #[arg(long, default_value_t = 30)]
    pub grid_size: u32,

    /// Concurrent search workers.
    #[arg(long, default_value_t = 20)]
    pub workers: usize,

    /// Number of priority buckets the frontier is split into.
    #[arg(long, default_value_t = 30)]
    pub priorities: usize,

    /// Nodes a worker expands before handing its frontier back.
    #[arg(long, default_value_t = 1024)]
    pub threshold: usize,

    /// Search repetitions over the same lattice.
    #[arg(long, default_value_t = 1)]
    pub runs: usize,

    /// Seed for the lattice's pseudo-random adjacency.
    #[arg(long, default_value_t = 74755)]
    pub seed: u64,

    /// Print one JSON object per run instead of a table.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("--grid-size must be between 2 and {max}, got {0}", max = MAX_GRID_SIZE)]
    GridSize(u32),

    #[error("--{0} must be at least 1")]
    Zero(&'static str),
}

impl Args {
    /// Check ranges and split out the search driver's settings.
    pub fn search_config(&self) -> Result<SearchConfig, ConfigError> {
        if !(2..=MAX_GRID_SIZE).contains(&self.grid_size) {
            return Err(ConfigError::GridSize(self.grid_size));
        }
        for (name, value) in [
            ("workers", self.workers),
            ("priorities", self.priorities),
            ("threshold", self.threshold),
            ("runs", self.runs),
        ] {
            if value == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        Ok(SearchConfig {
            workers: self.workers,
            priorities: self.priorities,
            threshold: self.threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("grid-search-bench").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.grid_size, 30);
        assert_eq!(args.seed, 74755);
        assert!(!args.json);
        let cfg = args.search_config().unwrap();
        assert_eq!(cfg.workers, 20);
        assert_eq!(cfg.priorities, 30);
        assert_eq!(cfg.threshold, 1024);
    }

    #[test]
    fn test_overrides() {
        let args = parse(&["--grid-size", "8", "--workers", "4", "--json"]);
        assert_eq!(args.grid_size, 8);
        assert!(args.json);
        assert_eq!(args.search_config().unwrap().workers, 4);
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let args = parse(&["--grid-size", "1"]);
        assert_eq!(args.search_config(), Err(ConfigError::GridSize(1)));
    }

    #[test]
    fn test_rejects_huge_grid() {
        let args = parse(&["--grid-size", "5000"]);
        assert_eq!(args.search_config(), Err(ConfigError::GridSize(5000)));
    }

    #[test]
    fn test_rejects_zero_workers() {
        let args = parse(&["--workers", "0"]);
        assert_eq!(args.search_config(), Err(ConfigError::Zero("workers")));
    }

    #[test]
    fn test_rejects_zero_runs() {
        let args = parse(&["--runs", "0"]);
        assert_eq!(args.search_config(), Err(ConfigError::Zero("runs")));
    }
}
