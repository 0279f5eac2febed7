//! Parser for the textual forest format.
//!
//! ```text
//! n
//! p_0 p_1 ... p_{n-1}
//! ```
//!
//! Tokens are whitespace separated; line breaks carry no meaning.

use tracing::{instrument, trace};

use crate::domain::MalformedInput;

/// Node count and raw parent indices as read from input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForestInput {
    pub node_count: usize,
    pub parents: Vec<i64>,
}

#[instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn parse_input(text: &str) -> Result<ForestInput, MalformedInput> {
    let mut tokens = text.split_whitespace().enumerate().map(|(i, t)| (i + 1, t));

    let (position, token) = tokens.next().ok_or(MalformedInput::EmptyInput)?;
    let count = parse_token(position, token)?;
    let node_count = usize::try_from(count)
        .ok()
        .filter(|&n| n > 0)
        .ok_or(MalformedInput::InvalidNodeCount(count))?;
    trace!(node_count, "Parsed node count");

    let mut parents = Vec::with_capacity(node_count.min(1 << 20));
    for (position, token) in tokens.by_ref().take(node_count) {
        parents.push(parse_token(position, token)?);
    }
    if parents.len() < node_count {
        return Err(MalformedInput::NodeCountMismatch {
            expected: node_count,
            found: parents.len(),
        });
    }

    if let Some((position, token)) = tokens.next() {
        return Err(MalformedInput::TrailingInput {
            position,
            token: token.to_string(),
        });
    }

    Ok(ForestInput {
        node_count,
        parents,
    })
}

fn parse_token(position: usize, token: &str) -> Result<i64, MalformedInput> {
    token.parse().map_err(|_| MalformedInput::InvalidToken {
        position,
        token: token.to_string(),
    })
}
