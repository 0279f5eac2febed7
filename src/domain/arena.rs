use std::fmt;

use termtree::Tree;
use tracing::instrument;

const ELLIPSIS: &str = "...";

/// Index of a node in its forest, equal to its position in the input.
pub type NodeId = usize;

/// Forest node in the arena-based structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestNode {
    /// Index of parent node in the arena, None for the root
    pub parent: Option<NodeId>,
    /// Indices of child nodes in declaration order
    pub children: Vec<NodeId>,
}

/// Arena-based single-rooted forest.
///
/// The forest owns every node in one contiguous `Vec`; nodes refer to each
/// other by index only. Instances are produced by
/// [`ForestBuilder`](crate::domain::ForestBuilder), which guarantees exactly one
/// root, in-range parents and no cycles, and are never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forest {
    nodes: Vec<ForestNode>,
    root: NodeId,
}

impl Forest {
    /// Wires up children from validated parent links.
    pub(crate) fn from_validated_parents(parents: &[Option<NodeId>], root: NodeId) -> Self {
        let mut nodes: Vec<ForestNode> = parents
            .iter()
            .map(|&parent| ForestNode {
                parent,
                children: Vec::new(),
            })
            .collect();

        for (child, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                nodes[parent].children.push(child);
            }
        }

        Self { nodes, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&ForestNode> {
        self.nodes.get(idx)
    }

    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.get_node(idx).and_then(|node| node.parent)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.get_node(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Pre-order iterator starting at the root, children left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self)
    }

    /// Post-order iterator: every node is yielded after all of its children.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }

    /// Leaf nodes (no children) in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Depth of every node, root = 1, indexed by node id.
    #[instrument(level = "debug", skip(self))]
    pub fn depths(&self) -> Vec<usize> {
        let mut depths = vec![0; self.nodes.len()];
        for (idx, node) in self.iter() {
            depths[idx] = node.parent.map_or(1, |parent| depths[parent] + 1);
        }
        depths
    }

    /// Renders the forest for display, labelling nodes by index.
    ///
    /// Nodes deeper than `max_depth` are collapsed into a single `...` leaf.
    #[instrument(level = "debug", skip(self))]
    pub fn to_tree_string(&self, max_depth: usize) -> Tree<String> {
        let depths = self.depths();
        // Subtrees are assembled bottom-up so deep chains do not recurse.
        let mut built: Vec<Option<Tree<String>>> = (0..self.nodes.len()).map(|_| None).collect();
        for (idx, node) in self.iter_postorder() {
            if depths[idx] > max_depth {
                continue;
            }
            let leaves: Vec<Tree<String>> = if depths[idx] == max_depth {
                if node.children.is_empty() {
                    Vec::new()
                } else {
                    vec![Tree::new(ELLIPSIS.to_string())]
                }
            } else {
                node.children
                    .iter()
                    .filter_map(|&child| built[child].take())
                    .collect()
            };
            built[idx] = Some(Tree::new(idx.to_string()).with_leaves(leaves));
        }
        built
            .get_mut(self.root)
            .and_then(Option::take)
            .unwrap_or_else(|| Tree::new("Empty forest".to_string()))
    }
}

impl fmt::Display for Forest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tree_string(usize::MAX))
    }
}

pub struct PreOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let mut stack = Vec::new();
        if !forest.is_empty() {
            stack.push(forest.root());
        }
        Self { forest, stack }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (NodeId, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        let current_idx = self.stack.pop()?;
        let node = self.forest.get_node(current_idx)?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some((current_idx, node))
    }
}

pub struct PostOrderIterator<'a> {
    forest: &'a Forest,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(forest: &'a Forest) -> Self {
        let mut stack = Vec::new();
        if !forest.is_empty() {
            stack.push((forest.root(), false));
        }
        Self { forest, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Forest {
        // 0 -> {1, 2}, 1 -> {3, 4}
        Forest::from_validated_parents(&[None, Some(0), Some(0), Some(1), Some(1)], 0)
    }

    #[test]
    fn children_follow_declaration_order() {
        let forest = sample();
        assert_eq!(forest.children(0), &[1, 2]);
        assert_eq!(forest.children(1), &[3, 4]);
        assert!(forest.children(2).is_empty());
        assert_eq!(forest.parent(3), Some(1));
        assert_eq!(forest.parent(0), None);
    }

    #[test]
    fn preorder_visits_left_to_right() {
        let order: Vec<_> = sample().iter().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![0, 1, 3, 4, 2]);
    }

    #[test]
    fn postorder_yields_children_before_parents() {
        let order: Vec<_> = sample().iter_postorder().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![3, 4, 1, 2, 0]);
    }

    #[test]
    fn leaves_and_depths() {
        let forest = sample();
        assert_eq!(forest.leaves(), vec![3, 4, 2]);
        assert_eq!(forest.depths(), vec![1, 2, 2, 3, 3]);
    }

    #[test]
    fn renders_tree_labelled_by_index() {
        let rendered = sample().to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "0");
        assert_eq!(lines.len(), 5);
        assert!(lines[1].ends_with("1"));
        assert!(lines[4].ends_with("2"));
    }

    #[test]
    fn rendering_collapses_below_max_depth() {
        let rendered = sample().to_tree_string(2).to_string();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].ends_with("..."));
        assert!(!rendered.contains('3'));
    }
}
