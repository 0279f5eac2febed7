//! I/O boundary traits
//!
//! The application reads its input through these traits so services can be
//! tested without touching stdin or the filesystem.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Source of raw forest text.
pub trait InputReader: Send + Sync {
    /// Read all of standard input.
    fn read_stdin(&self) -> io::Result<String>;

    /// Read file contents to string.
    fn read_file(&self, path: &Path) -> io::Result<String>;
}

/// Real implementation backed by the process stdin and `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealInputReader;

impl InputReader for RealInputReader {
    fn read_stdin(&self) -> io::Result<String> {
        let mut buf = String::new();
        io::stdin().lock().read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

/// In-memory reader: fixed stdin text plus named files.
#[derive(Debug, Default, Clone)]
pub struct MemoryInputReader {
    stdin: String,
    files: Vec<(PathBuf, String)>,
}

impl MemoryInputReader {
    pub fn with_stdin(stdin: impl Into<String>) -> Self {
        Self {
            stdin: stdin.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, path: impl AsRef<Path>, content: impl Into<String>) -> Self {
        self.files.push((path.as_ref().to_path_buf(), content.into()));
        self
    }
}

impl InputReader for MemoryInputReader {
    fn read_stdin(&self) -> io::Result<String> {
        Ok(self.stdin.clone())
    }

    fn read_file(&self, path: &Path) -> io::Result<String> {
        self.files
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, content)| content.clone())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }
}
