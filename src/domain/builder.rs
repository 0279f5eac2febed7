//! Forest builder: validates parent indices and wires up the arena.

use tracing::{debug, instrument};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::{DomainError, MalformedInput};

/// Result type for forest operations.
pub type ForestResult<T> = Result<T, DomainError>;

/// Constructs a [`Forest`] from a flat parent-pointer encoding.
///
/// A negative parent marks the root. Exactly one root is allowed, every other
/// parent must lie in `0..node_count`, and every node must be reachable from
/// the root.
#[derive(Debug, Default)]
pub struct ForestBuilder {
    parents: Vec<Option<NodeId>>,
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a forest of `node_count` nodes from raw parent indices.
    #[instrument(level = "debug", skip(self, parents), fields(parents = parents.len()))]
    pub fn build(&mut self, node_count: usize, parents: &[i64]) -> ForestResult<Forest> {
        if node_count == 0 {
            return Err(MalformedInput::EmptyForest.into());
        }
        if parents.len() != node_count {
            return Err(MalformedInput::NodeCountMismatch {
                expected: node_count,
                found: parents.len(),
            }
            .into());
        }

        // Reset state for a fresh build
        self.parents.clear();
        self.parents.reserve(node_count);

        let mut root: Option<NodeId> = None;
        for (node, &parent) in parents.iter().enumerate() {
            if parent < 0 {
                if let Some(first) = root {
                    return Err(MalformedInput::MultipleRoots {
                        first,
                        second: node,
                    }
                    .into());
                }
                root = Some(node);
                self.parents.push(None);
                continue;
            }

            let parent_idx = usize::try_from(parent)
                .ok()
                .filter(|&p| p < node_count)
                .ok_or(MalformedInput::ParentOutOfRange {
                    node,
                    parent,
                    node_count,
                })?;
            if parent_idx == node {
                return Err(MalformedInput::CycleDetected { node }.into());
            }
            self.parents.push(Some(parent_idx));
        }

        let root = root.ok_or(MalformedInput::NoRoot)?;
        let forest = Forest::from_validated_parents(&self.parents, root);
        self.check_reachable(&forest)?;

        debug!(nodes = forest.len(), root, "Built forest");
        Ok(forest)
    }

    /// With one root and `n - 1` parent links, any node not reachable from the
    /// root sits on a cycle (or hangs off one).
    fn check_reachable(&self, forest: &Forest) -> ForestResult<()> {
        let mut seen = vec![false; forest.len()];
        for (idx, _) in forest.iter() {
            seen[idx] = true;
        }
        match seen.iter().position(|&reached| !reached) {
            Some(node) => Err(MalformedInput::CycleDetected {
                node: self.first_on_cycle(node),
            }
            .into()),
            None => Ok(()),
        }
    }

    /// Walks parent links from `start` until a node repeats.
    fn first_on_cycle(&self, start: NodeId) -> NodeId {
        let mut on_path = vec![false; self.parents.len()];
        let mut current = start;
        while let Some(parent) = self.parents[current] {
            if on_path[current] {
                return current;
            }
            on_path[current] = true;
            current = parent;
        }
        start
    }
}
