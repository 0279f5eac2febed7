//! Height service
//!
//! Reads forest text from stdin or a file, builds the forest and computes its
//! height with the configured strategy.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{compute_height_with, Forest, ForestBuilder};
use crate::infrastructure::InputReader;
use crate::parser::parse_input;

/// Where forest text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `None` and `-` mean stdin.
    pub fn from_arg(arg: Option<&Path>) -> Self {
        match arg {
            None => InputSource::Stdin,
            Some(path) if path == Path::new("-") => InputSource::Stdin,
            Some(path) => InputSource::File(path.to_path_buf()),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Service computing tree heights.
pub struct HeightService {
    reader: Arc<dyn InputReader>,
    settings: Settings,
}

impl HeightService {
    /// Create a new height service.
    pub fn new(reader: Arc<dyn InputReader>, settings: Settings) -> Self {
        Self { reader, settings }
    }

    /// Read raw text from the given source.
    fn read(&self, source: &InputSource) -> ApplicationResult<String> {
        match source {
            InputSource::Stdin => self
                .reader
                .read_stdin()
                .with_path_context("read input", Path::new("<stdin>")),
            InputSource::File(path) => self
                .reader
                .read_file(path)
                .with_path_context("read input", path),
        }
    }

    /// Parse text into a validated forest.
    pub fn parse_forest(&self, text: &str) -> ApplicationResult<Forest> {
        let input = parse_input(text)?;
        let forest = ForestBuilder::new().build(input.node_count, &input.parents)?;
        Ok(forest)
    }

    /// Read and build the forest from `source`.
    #[instrument(level = "debug", skip(self))]
    pub fn load_forest(&self, source: &InputSource) -> ApplicationResult<Forest> {
        let text = self.read(source)?;
        debug!("Read {} bytes from {}", text.len(), source);
        self.parse_forest(&text)
    }

    /// Height of an already built forest using the configured strategy.
    pub fn compute(&self, forest: &Forest) -> ApplicationResult<usize> {
        let height =
            compute_height_with(forest, self.settings.strategy, self.settings.stack_size)?;
        info!(
            height,
            nodes = forest.len(),
            strategy = %self.settings.strategy,
            "Computed tree height"
        );
        Ok(height)
    }

    /// Read, build and measure in one step.
    #[instrument(level = "debug", skip(self))]
    pub fn height(&self, source: &InputSource) -> ApplicationResult<usize> {
        let forest = self.load_forest(source)?;
        self.compute(&forest)
    }
}
