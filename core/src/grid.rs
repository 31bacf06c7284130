use tracing::debug;

use crate::error::{GridError, GridResult, PathError};
use crate::node::{GridNode, NodeId};

/// Arena owning every node of a search lattice.
///
/// Nodes refer to each other by `NodeId` (their index here), so the grid is
/// the only owner and there are no reference cycles. Building the adjacency
/// needs `&mut Grid`; searching needs only `&Grid`, which is `Sync` and can
/// be handed to any number of scoped worker threads.
pub struct Grid {
    nodes: Vec<GridNode>,
}

impl Grid {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Pre-allocate for a known node count.
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(node_count),
        }
    }

    /// Append a node at `(i, j, k)` and return its id.
    pub fn add_node(&mut self, i: i32, j: i32, k: i32) -> GridResult<NodeId> {
        let id = NodeId::try_from(self.nodes.len())
            .ok()
            .filter(|&id| id != NodeId::MAX)
            .ok_or(GridError::Full(self.nodes.len()))?;
        self.nodes.push(GridNode::new(id, i, j, k));
        Ok(id)
    }

    /// Add `to` to the adjacency list of `from`. Edges are directed.
    ///
    /// Returns `Ok(false)` for self-links and duplicates, like
    /// [`GridNode::add_neighbor`].
    pub fn connect(&mut self, from: NodeId, to: NodeId) -> GridResult<bool> {
        self.node(to).ok_or(GridError::UnknownNode(to))?;
        let node = self
            .nodes
            .get_mut(from as usize)
            .ok_or(GridError::UnknownNode(from))?;
        Ok(node.add_neighbor(to))
    }

    /// Add edges in both directions. Returns whether either edge was new.
    pub fn connect_both(&mut self, a: NodeId, b: NodeId) -> GridResult<bool> {
        let forward = self.connect(a, b)?;
        let backward = self.connect(b, a)?;
        Ok(forward || backward)
    }

    pub fn node(&self, id: NodeId) -> Option<&GridNode> {
        self.nodes.get(id as usize)
    }

    fn get(&self, id: NodeId) -> GridResult<&GridNode> {
        self.node(id).ok_or(GridError::UnknownNode(id))
    }

    /// Claim `node` on behalf of `candidate`. See [`GridNode::attempt_claim`].
    pub fn claim(&self, node: NodeId, candidate: NodeId) -> GridResult<bool> {
        self.get(candidate)?;
        Ok(self.get(node)?.attempt_claim(candidate))
    }

    /// Make `start` its own parent so it reads as the root of every chain.
    pub fn mark_root(&self, start: NodeId) -> GridResult<bool> {
        self.claim(start, start)
    }

    pub fn distance(&self, a: NodeId, b: NodeId) -> GridResult<f64> {
        Ok(self.get(a)?.distance_to(self.get(b)?))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.neighbors().len()).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridNode> {
        self.nodes.iter()
    }

    /// Number of nodes whose parent slot is set.
    pub fn claimed_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_claimed()).count()
    }

    /// Clear every parent slot so the same topology can be searched again.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.reset_parent();
        }
        debug!(nodes = self.nodes.len(), "grid parents reset");
    }

    /// Follow parent backlinks from `goal` back to `start`.
    ///
    /// Returns the path start-first, including both endpoints. The walk is
    /// bounded by the node count, so a corrupt chain ends in
    /// [`PathError::Cycle`] instead of spinning.
    ///
    /// Only meaningful once the search workers have been joined.
    pub fn path_to(&self, start: NodeId, goal: NodeId) -> Result<Vec<NodeId>, PathError> {
        self.node(start).ok_or(PathError::UnknownNode(start))?;
        self.node(goal).ok_or(PathError::UnknownNode(goal))?;

        let mut path = vec![goal];
        let mut current = goal;

        while current != start {
            if path.len() > self.nodes.len() {
                return Err(PathError::Cycle { start, goal });
            }
            let parent = self.nodes[current as usize]
                .parent()
                .ok_or(PathError::Unreached(current))?;
            path.push(parent);
            current = parent;
        }

        path.reverse();
        debug!(start, goal, hops = path.len() - 1, "path reconstructed");
        Ok(path)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}
