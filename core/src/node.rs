use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Index of a node inside its owning [`Grid`](crate::Grid).
pub type NodeId = u32;

/// Parent-slot value meaning "nobody has claimed this node yet".
const UNSET: u32 = u32::MAX;

/// A vertex of the 3D search lattice.
///
/// The node owns nothing but its own coordinates. Neighbors and the parent
/// are `NodeId` backlinks into the grid that owns every node.
///
/// The adjacency list is only mutable through `&mut self`, so it is fixed
/// for as long as the grid is shared between search workers. The parent
/// slot is the one field written concurrently, and it is written once.
#[derive(Debug)]
pub struct GridNode {
    id: NodeId,
    i: i32,
    j: i32,
    k: i32,
    parent: AtomicU32,
    neighbors: Vec<NodeId>,
}

impl GridNode {
    /// Only [`Grid::add_node`](crate::Grid::add_node) hands out ids, and it
    /// never hands out the reserved `NodeId::MAX`.
    pub(crate) fn new(id: NodeId, i: i32, j: i32, k: i32) -> Self {
        Self {
            id,
            i,
            j,
            k,
            parent: AtomicU32::new(UNSET),
            neighbors: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn i(&self) -> i32 {
        self.i
    }

    pub fn j(&self) -> i32 {
        self.j
    }

    pub fn k(&self) -> i32 {
        self.k
    }

    pub fn coords(&self) -> (i32, i32, i32) {
        (self.i, self.j, self.k)
    }

    /// Adjacent nodes in insertion order.
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    /// Try to become the first (and only) writer of this node's parent.
    ///
    /// Returns `true` for exactly one call per node: the caller that moved
    /// the slot from unset to `candidate`. Every other call returns `false`
    /// and leaves the slot alone, including a retry by the winner itself.
    /// `NodeId::MAX` is never a valid parent and always loses.
    ///
    /// The exchange is `Relaxed`. It orders nothing but the slot, so a
    /// reader walking parent chains after a search must first synchronize
    /// with the workers (join them, or acquire a flag they released).
    pub fn attempt_claim(&self, candidate: NodeId) -> bool {
        if candidate == UNSET {
            return false;
        }
        self.parent
            .compare_exchange(UNSET, candidate, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
    }

    /// The node that claimed this one, if any.
    ///
    /// Same caller obligation as [`attempt_claim`](Self::attempt_claim):
    /// mid-search this is only a hint.
    pub fn parent(&self) -> Option<NodeId> {
        match self.parent.load(Ordering::Relaxed) {
            UNSET => None,
            id => Some(id),
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.parent().is_some()
    }

    /// Return the parent slot to unset. Needs exclusive access, so it can
    /// only run between searches.
    pub fn reset_parent(&mut self) {
        *self.parent.get_mut() = UNSET;
    }

    /// Euclidean distance between the two nodes' lattice coordinates.
    pub fn distance_to(&self, other: &GridNode) -> f64 {
        let di = (i64::from(self.i) - i64::from(other.i)) as f64;
        let dj = (i64::from(self.j) - i64::from(other.j)) as f64;
        let dk = (i64::from(self.k) - i64::from(other.k)) as f64;
        (di * di + dj * dj + dk * dk).sqrt()
    }

    /// Append `node` to the adjacency list.
    ///
    /// Rejects a link to this node itself and links already present.
    /// Returns whether the list grew.
    pub fn add_neighbor(&mut self, node: NodeId) -> bool {
        if node == self.id || self.neighbors.contains(&node) {
            return false;
        }
        self.neighbors.push(node);
        true
    }
}

impl fmt::Display for GridNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.i, self.j, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    use proptest::prelude::*;

    #[test]
    fn test_new_node_is_unclaimed() {
        let n = GridNode::new(7, 1, 2, 3);
        assert_eq!(n.id(), 7);
        assert_eq!(n.coords(), (1, 2, 3));
        assert_eq!(n.parent(), None);
        assert!(!n.is_claimed());
        assert!(n.neighbors().is_empty());
    }

    #[test]
    fn test_claim_first_wins() {
        let n = GridNode::new(0, 0, 0, 0);
        assert!(n.attempt_claim(5));
        assert_eq!(n.parent(), Some(5));
        assert!(!n.attempt_claim(6));
        assert_eq!(n.parent(), Some(5));
    }

    #[test]
    fn test_claim_retry_by_winner_is_rejected() {
        let n = GridNode::new(0, 0, 0, 0);
        assert!(n.attempt_claim(3));
        assert!(!n.attempt_claim(3));
        assert_eq!(n.parent(), Some(3));
    }

    #[test]
    fn test_claim_with_reserved_id_loses() {
        let n = GridNode::new(0, 0, 0, 0);
        assert!(!n.attempt_claim(NodeId::MAX));
        assert_eq!(n.parent(), None);
        assert!(n.attempt_claim(7));
        assert!(!n.attempt_claim(8));
        assert_eq!(n.parent(), Some(7));
    }

    #[test]
    fn test_self_claim_is_allowed() {
        // A search root marks itself as its own parent.
        let n = GridNode::new(4, 0, 0, 0);
        assert!(n.attempt_claim(4));
        assert_eq!(n.parent(), Some(4));
    }

    #[test]
    fn test_reset_parent() {
        let mut n = GridNode::new(0, 0, 0, 0);
        assert!(n.attempt_claim(1));
        n.reset_parent();
        assert_eq!(n.parent(), None);
        assert!(n.attempt_claim(2));
        assert_eq!(n.parent(), Some(2));
    }

    #[test]
    fn test_concurrent_claim_single_winner() {
        const THREADS: u32 = 16;
        let node = GridNode::new(0, 0, 0, 0);
        let barrier = Barrier::new(THREADS as usize);

        let winners: Vec<u32> = thread::scope(|s| {
            let handles: Vec<_> = (1..=THREADS)
                .map(|candidate| {
                    let node = &node;
                    let barrier = &barrier;
                    s.spawn(move || {
                        barrier.wait();
                        node.attempt_claim(candidate).then_some(candidate)
                    })
                })
                .collect();
            handles
                .into_iter()
                .filter_map(|h| h.join().unwrap())
                .collect()
        });

        assert_eq!(winners.len(), 1);
        assert_eq!(node.parent(), Some(winners[0]));
    }

    #[test]
    fn test_distance_pythagorean() {
        let a = GridNode::new(0, 0, 0, 0);
        let b = GridNode::new(1, 3, 4, 0);
        assert_eq!(a.distance_to(&b), 5.0);
    }

    #[test]
    fn test_distance_same_coords() {
        let a = GridNode::new(0, 1, 2, 3);
        let b = GridNode::new(1, 1, 2, 3);
        assert_eq!(a.distance_to(&b), 0.0);
        assert_eq!(a.distance_to(&a), 0.0);
    }

    #[test]
    fn test_distance_extreme_coords_no_overflow() {
        let a = GridNode::new(0, i32::MIN, 0, 0);
        let b = GridNode::new(1, i32::MAX, 0, 0);
        let d = a.distance_to(&b);
        assert!((d - u32::MAX as f64).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_add_neighbor_rejects_self() {
        let mut n = GridNode::new(2, 0, 0, 0);
        assert!(!n.add_neighbor(2));
        assert!(n.neighbors().is_empty());
    }

    #[test]
    fn test_add_neighbor_dedup() {
        let mut n = GridNode::new(0, 0, 0, 0);
        assert!(n.add_neighbor(1));
        assert!(!n.add_neighbor(1));
        assert!(n.add_neighbor(2));
        assert!(!n.add_neighbor(1));
        assert_eq!(n.neighbors(), &[1, 2]);
    }

    #[test]
    fn test_display() {
        let n = GridNode::new(0, 1, -2, 30);
        assert_eq!(n.to_string(), "[1, -2, 30]");
    }

    proptest! {
        #[test]
        fn prop_distance_symmetric(
            a in (-1000i32..1000, -1000i32..1000, -1000i32..1000),
            b in (-1000i32..1000, -1000i32..1000, -1000i32..1000),
        ) {
            let na = GridNode::new(0, a.0, a.1, a.2);
            let nb = GridNode::new(1, b.0, b.1, b.2);
            prop_assert_eq!(na.distance_to(&nb), nb.distance_to(&na));
        }

        #[test]
        fn prop_distance_non_negative_and_zero_only_when_equal(
            a in (-50i32..50, -50i32..50, -50i32..50),
            b in (-50i32..50, -50i32..50, -50i32..50),
        ) {
            let na = GridNode::new(0, a.0, a.1, a.2);
            let nb = GridNode::new(1, b.0, b.1, b.2);
            let d = na.distance_to(&nb);
            prop_assert!(d >= 0.0);
            prop_assert_eq!(d == 0.0, a == b);
        }
    }
}
