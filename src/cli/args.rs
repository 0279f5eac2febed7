//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::domain::HeightStrategy;

/// Compute the height of a tree given as a list of parent indices
///
/// Input format: node count `n`, then `n` parent indices; a negative index marks the root.
/// Without a command, reads stdin and prints the height.
#[derive(Parser, Debug)]
#[command(name = "tree-height")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Height algorithm (overrides config)
    #[arg(long, value_enum, global = true)]
    pub strategy: Option<HeightStrategy>,

    /// Stack size in bytes for the recursive strategy (overrides config)
    #[arg(long, global = true)]
    pub stack_size: Option<usize>,

    /// Config file (default: $XDG_CONFIG_HOME/tree-height/tree-height.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the tree height
    Height {
        /// Input file (default: stdin, `-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show the tree structure
    Show {
        /// Input file (default: stdin, `-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Collapse levels below this depth
        #[arg(long, default_value_t = 32)]
        max_depth: usize,
    },

    /// List leaf nodes in pre-order
    Leaves {
        /// Input file (default: stdin, `-` for stdin)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config path
    Path,
}
