//! Cost-minimizing goal planner.
//!
//! # Semantics
//!
//! [`Planner::plan`] explores every ordering of the usable goals depth-first:
//!
//! 1. from a node, every remaining goal whose preconditions hold produces a
//!    child with the goal's effects applied and its cost added
//! 2. a child that satisfies the target is a solution leaf and is not
//!    expanded further
//! 3. any other child is expanded with the applied goal removed, so no goal
//!    appears twice in one plan
//!
//! The cheapest leaf wins; among equal costs the leaf discovered first wins
//! (goals are tried in index order). The plan is the leaf's path from the
//! root, in execution order. No leaf means an empty plan, which is a normal
//! outcome.
//!
//! The search is exhaustive and its worst case is factorial in the number of
//! usable goals; precondition checks prune most branches in practice. The
//! node arena and leaf heap are kept between calls, so a warmed-up planner
//! allocates only when a search is larger than every earlier one.

mod node;

pub use node::{Leaf, Node};

use std::collections::BinaryHeap;

use crate::agent::Goal;
use crate::config::AgentConfig;
use crate::error::{CoreError, ErrorSeverity};
use crate::state::{FactMap, WorldState};

/// Errors raised by [`Planner::plan`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("{count} goals exceed the planner limit of {}", AgentConfig::MAX_GOALS)]
    TooManyGoals { count: usize },
}

impl CoreError for PlanError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TooManyGoals { .. } => "PLAN_TOO_MANY_GOALS",
        }
    }
}

/// Ordered goal indices and their total cost.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Plan {
    /// Indices into the goal slice, first step first.
    pub steps: Vec<usize>,
    pub cost: f32,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Goal to execute now.
    pub fn first(&self) -> Option<usize> {
        self.steps.first().copied()
    }
}

/// Reusable planner; one per agent.
#[derive(Debug, Default)]
pub struct Planner {
    nodes: Vec<Node>,
    leaves: BinaryHeap<Leaf>,
    seq: u64,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cheapest plan from `start` to `target` using the goals whose bit is
    /// set in `usable`.
    ///
    /// Bits of `usable` beyond `goals.len()` are ignored.
    ///
    /// # Errors
    ///
    /// [`PlanError::TooManyGoals`] when `goals` does not fit the `u64` mask.
    pub fn plan<G: Goal>(
        &mut self,
        goals: &[G],
        usable: u64,
        start: WorldState,
        target: &FactMap,
    ) -> Result<Plan, PlanError> {
        if goals.len() > AgentConfig::MAX_GOALS {
            return Err(PlanError::TooManyGoals { count: goals.len() });
        }
        let usable = usable & Self::all_goals(goals.len());

        self.nodes.clear();
        self.leaves.clear();
        self.seq = 0;
        self.nodes.push(Node::root(start));
        self.expand(goals, 0, usable, target);

        let Some(best) = self.leaves.pop() else {
            tracing::debug!("no plan from {} to {}", start, target);
            return Ok(Plan::default());
        };

        let mut steps = Vec::new();
        let mut cursor = Some(best.node);
        while let Some(index) = cursor {
            let node = &self.nodes[index];
            if let Some(goal) = node.goal {
                steps.push(goal);
            }
            cursor = node.parent;
        }
        steps.reverse();

        tracing::debug!(
            "plan of {} steps, cost {}, from {} nodes and {} leaves",
            steps.len(),
            best.cost,
            self.nodes.len(),
            self.leaves.len() + 1
        );
        Ok(Plan {
            steps,
            cost: best.cost,
        })
    }

    /// Nodes created by the last call.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn all_goals(len: usize) -> u64 {
        if len >= 64 { u64::MAX } else { (1u64 << len) - 1 }
    }

    fn expand<G: Goal>(&mut self, goals: &[G], parent: usize, remaining: u64, target: &FactMap) {
        let Node { cost, state, .. } = self.nodes[parent];

        let mut candidates = remaining;
        while candidates != 0 {
            let index = candidates.trailing_zeros() as usize;
            candidates &= candidates - 1;

            let goal = &goals[index];
            if !goal.preconditions().satisfied_by(state) {
                continue;
            }

            let child = self.nodes.len();
            let child_state = goal.effects().apply(state);
            let child_cost = cost + goal.cost();
            self.nodes.push(Node {
                parent: Some(parent),
                cost: child_cost,
                state: child_state,
                goal: Some(index),
            });

            if target.satisfied_by(child_state) {
                self.leaves.push(Leaf {
                    cost: child_cost,
                    seq: self.seq,
                    node: child,
                });
                self.seq += 1;
            } else {
                self.expand(goals, child, remaining & !(1u64 << index), target);
            }
        }
    }
}
