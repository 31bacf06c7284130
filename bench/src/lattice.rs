use grid_search_core::{Grid, GridResult, NodeId};
use tracing::debug;

/// Small deterministic LCG, 16 bits of state.
pub struct PseudoRandom(u64);

impl PseudoRandom {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_value(&mut self) -> u64 {
        self.0 = (self.0.wrapping_mul(1309).wrapping_add(13849)) & 65535;
        self.0
    }

    /// Coin flip on the high bit; the low bits of this generator alternate.
    pub fn next_bool(&mut self) -> bool {
        self.next_value() >= 32768
    }
}

/// Forward offsets a node may link along, `(0,0,0)` excluded.
const OFFSETS: [(i32, i32, i32); 7] = [
    (0, 0, 1),
    (0, 1, 0),
    (0, 1, 1),
    (1, 0, 0),
    (1, 0, 1),
    (1, 1, 0),
    (1, 1, 1),
];

/// Arena id of lattice coordinate `(i, j, k)` in an `n^3` grid.
pub fn lattice_id(size: u32, i: u32, j: u32, k: u32) -> NodeId {
    size * size * i + size * j + k
}

/// Build an `n × n × n` lattice with pseudo-random forward adjacency.
///
/// Each node tries the seven forward offsets, clamped to the grid edge. A
/// coin decides each one, except that the last is forced while the node
/// still has no neighbor. Clamped self-links and repeats fall out through
/// `add_neighbor`, so only the far corner ends up with no neighbors.
///
/// Every other node has a link that raises `i + j + k`, so the far corner is
/// reachable from anywhere.
pub fn build_lattice(size: u32, seed: u64) -> GridResult<Grid> {
    let n = size as usize;
    let mut grid = Grid::with_capacity(n * n * n);
    let mut rng = PseudoRandom::new(seed);

    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                grid.add_node(i as i32, j as i32, k as i32)?;
            }
        }
    }

    let last = size - 1;
    for i in 0..size {
        for j in 0..size {
            for k in 0..size {
                let from = lattice_id(size, i, j, k);
                let mut linked = 0usize;
                for (idx, &(di, dj, dk)) in OFFSETS.iter().enumerate() {
                    let forced = idx == OFFSETS.len() - 1 && linked == 0;
                    if !(forced || rng.next_bool()) {
                        continue;
                    }
                    let to = lattice_id(
                        size,
                        (i + di as u32).min(last),
                        (j + dj as u32).min(last),
                        (k + dk as u32).min(last),
                    );
                    if grid.connect(from, to)? {
                        linked += 1;
                    }
                }
            }
        }
    }

    debug!(
        size,
        nodes = grid.len(),
        edges = grid.edge_count(),
        "lattice built"
    );
    Ok(grid)
}
