//! Domain layer: the forest arena and the height computation
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod height;

pub use arena::{Forest, ForestNode, NodeId};
pub use builder::{ForestBuilder, ForestResult};
pub use error::{DomainError, MalformedInput};
pub use height::{
    compute_height, compute_height_recursive, compute_height_with, HeightStrategy,
    DEFAULT_STACK_SIZE,
};
