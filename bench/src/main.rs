use clap::Parser;
use tracing::{info, warn};

mod config;
mod lattice;
mod report;
mod search;

use config::Args;
use lattice::{build_lattice, lattice_id};
use report::RunReport;
use search::guided_search;

fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("grid_search_bench=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let search_config = args.search_config()?;

    let size = args.grid_size;
    let t = std::time::Instant::now();
    let mut grid = build_lattice(size, args.seed)?;
    info!(
        size,
        nodes = grid.len(),
        edges = grid.edge_count(),
        elapsed_ms = t.elapsed().as_secs_f64() * 1000.0,
        "lattice ready"
    );

    let start = lattice_id(size, 0, 0, 0);
    let goal = lattice_id(size, size - 1, size - 1, size - 1);
    if let (Some(s), Some(g)) = (grid.node(start), grid.node(goal)) {
        info!(start = %s, goal = %g, workers = search_config.workers, "searching");
    }

    if !args.json {
        report::print_header();
    }

    for run in 0..args.runs {
        if run > 0 {
            grid.reset();
        }
        let outcome = guided_search(&grid, start, goal, &search_config)?;
        if !outcome.found {
            warn!(run, claimed = outcome.claimed, "goal not reached");
        }

        let row = RunReport::new(run, size, search_config.workers, &outcome);
        if args.json {
            println!("{}", row.to_json()?);
        } else {
            report::print_row(&row);
        }
    }

    Ok(())
}
