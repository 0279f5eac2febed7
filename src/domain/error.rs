//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the forest invariants.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),

    #[error("stack exhausted at depth {depth} (limit {limit})")]
    StackExhaustion { depth: usize, limit: usize },

    #[error("cannot start recursion thread with a {stack_size}-byte stack: {reason}")]
    ThreadSpawn { stack_size: usize, reason: String },
}

/// Ways in which input fails to describe a single-rooted forest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    #[error("input is empty")]
    EmptyInput,

    #[error("input is not valid UTF-8")]
    InvalidEncoding,

    #[error("token {position} is not an integer: {token:?}")]
    InvalidToken { position: usize, token: String },

    #[error("node count must be positive, got {0}")]
    InvalidNodeCount(i64),

    #[error("forest has no nodes")]
    EmptyForest,

    #[error("expected {expected} parent indices, found {found}")]
    NodeCountMismatch { expected: usize, found: usize },

    #[error("unexpected trailing token {position}: {token:?}")]
    TrailingInput { position: usize, token: String },

    #[error("no root node (no negative parent index)")]
    NoRoot,

    #[error("multiple root nodes: {first} and {second}")]
    MultipleRoots { first: usize, second: usize },

    #[error("node {node} has parent {parent} outside 0..{node_count}")]
    ParentOutOfRange {
        node: usize,
        parent: i64,
        node_count: usize,
    },

    #[error("cycle detected involving node {node}")]
    CycleDetected { node: usize },
}
