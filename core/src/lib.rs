//! grid-search-core: lock-free nodes for parallel guided search.
//!
//! A [`Grid`] owns the nodes of a 3D lattice. Each [`GridNode`] carries its
//! coordinates, an adjacency list that is frozen once construction ends, and
//! a write-once parent slot that any number of search workers may race to
//! claim. Exactly one claim per node succeeds, which makes the parent chain
//! from goal back to start well defined.
//!
//! The search itself (frontier order, heuristic, termination) belongs to the
//! caller; see the `grid-search-bench` crate for a parallel driver.

mod error;
mod grid;
mod node;

pub use error::{GridError, GridResult, PathError};
pub use grid::Grid;
pub use node::{GridNode, NodeId};
