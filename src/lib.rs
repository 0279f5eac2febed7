//! Compute the height of a tree described by parent indices.
//!
//! Input is a node count followed by one parent index per node; a negative
//! index marks the root:
//!
//! ```
//! use tree_height::height_of_str;
//!
//! assert_eq!(height_of_str("5\n-1 0 0 1 1\n").unwrap(), 3);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod parser;
pub mod util;

use crate::application::ApplicationResult;
use crate::domain::{compute_height, ForestBuilder};
use crate::parser::parse_input;

/// Parse forest text and compute its height with the iterative strategy.
pub fn height_of_str(text: &str) -> ApplicationResult<usize> {
    let input = parse_input(text)?;
    let forest = ForestBuilder::new().build(input.node_count, &input.parents)?;
    Ok(compute_height(&forest))
}
