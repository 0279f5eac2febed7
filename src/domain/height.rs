//! Height computation over a [`Forest`].
//!
//! The default strategy is an explicit-stack post-order walk whose call-stack
//! use is constant, so arbitrarily long chains are safe. The recursive
//! strategy runs on a dedicated thread with a reserved stack and a matching
//! depth budget; exceeding the budget is reported as
//! [`DomainError::StackExhaustion`] rather than overflowing.

use std::fmt;
use std::str::FromStr;
use std::thread;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::builder::ForestResult;
use crate::domain::error::DomainError;

/// Stack bytes budgeted per level of recursion.
pub const FRAME_BUDGET_BYTES: usize = 1024;

/// Stack reserved for the recursive strategy unless configured otherwise.
pub const DEFAULT_STACK_SIZE: usize = 16 * 1024 * 1024;

/// How the height is computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeightStrategy {
    /// Explicit-stack post-order traversal
    #[default]
    Iterative,
    /// Call-stack recursion on a thread with an enlarged stack
    Recursive,
}

impl fmt::Display for HeightStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeightStrategy::Iterative => write!(f, "iterative"),
            HeightStrategy::Recursive => write!(f, "recursive"),
        }
    }
}

impl FromStr for HeightStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "iterative" => Ok(HeightStrategy::Iterative),
            "recursive" => Ok(HeightStrategy::Recursive),
            other => Err(format!("unknown strategy: {other}")),
        }
    }
}

/// Number of nodes on the longest root-to-leaf path.
///
/// `height(node) = 1 + max(height(child))`, with the maximum over no children
/// taken as 0. An empty forest has height 0.
#[instrument(level = "debug", skip(forest), fields(nodes = forest.len()))]
pub fn compute_height(forest: &Forest) -> usize {
    let mut heights = vec![0usize; forest.len()];
    for (idx, node) in forest.iter_postorder() {
        heights[idx] = 1 + node
            .children
            .iter()
            .map(|&child| heights[child])
            .max()
            .unwrap_or(0);
    }
    let height = heights.get(forest.root()).copied().unwrap_or(0);
    debug!(height, "Computed height");
    height
}

/// Recursive height with a depth budget derived from `stack_size`.
///
/// The recursion runs on its own thread so the reserved stack does not depend
/// on the caller's.
#[instrument(level = "debug", skip(forest), fields(nodes = forest.len()))]
pub fn compute_height_recursive(forest: &Forest, stack_size: usize) -> ForestResult<usize> {
    let limit = depth_limit(stack_size);
    let spawned = thread::scope(|scope| {
        thread::Builder::new()
            .name("tree-height-recursive".into())
            .stack_size(stack_size)
            .spawn_scoped(scope, || height_of(forest, forest.root(), 1, limit))
            .map(|handle| handle.join())
    });

    match spawned {
        Ok(Ok(result)) => result,
        Ok(Err(_)) => Err(DomainError::StackExhaustion { depth: limit, limit }),
        Err(e) => {
            debug!("Cannot spawn recursion thread: {}", e);
            Err(DomainError::ThreadSpawn {
                stack_size,
                reason: e.to_string(),
            })
        }
    }
}

/// Dispatch on the configured strategy.
pub fn compute_height_with(
    forest: &Forest,
    strategy: HeightStrategy,
    stack_size: usize,
) -> ForestResult<usize> {
    match strategy {
        HeightStrategy::Iterative => Ok(compute_height(forest)),
        HeightStrategy::Recursive => compute_height_recursive(forest, stack_size),
    }
}

/// Deepest recursion allowed for a given stack size.
pub fn depth_limit(stack_size: usize) -> usize {
    (stack_size / FRAME_BUDGET_BYTES).max(1)
}

fn height_of(forest: &Forest, idx: NodeId, depth: usize, limit: usize) -> ForestResult<usize> {
    if depth > limit {
        return Err(DomainError::StackExhaustion { depth, limit });
    }
    let Some(node) = forest.get_node(idx) else {
        return Ok(0);
    };
    let mut max_child = 0;
    for &child in &node.children {
        max_child = max_child.max(height_of(forest, child, depth + 1, limit)?);
    }
    Ok(max_child + 1)
}
