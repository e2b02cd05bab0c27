use core::cmp::Ordering;

use crate::state::WorldState;

/// Search node stored in the planner's arena.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub parent: Option<usize>,
    /// Running cost from the root.
    pub cost: f32,
    pub state: WorldState,
    /// Goal applied to reach this node; `None` for the root.
    pub goal: Option<usize>,
}

impl Node {
    pub const fn root(state: WorldState) -> Self {
        Self {
            parent: None,
            cost: 0.0,
            state,
            goal: None,
        }
    }
}

/// A node whose state satisfies the target.
///
/// Ordered so that [`std::collections::BinaryHeap`] pops the cheapest leaf,
/// and among equal costs the one discovered first.
#[derive(Clone, Copy, Debug)]
pub struct Leaf {
    pub cost: f32,
    pub seq: u64,
    pub node: usize,
}

impl Ord for Leaf {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Leaf {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Leaf {}
