//! Error conversion helpers for input reading
//!
//! Provides an extension trait for cleaner error handling with path context.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::MalformedInput;

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// A `NotFound` error becomes [`ApplicationError::InputNotFound`];
    /// `InvalidData` (text that is not UTF-8) is malformed input.
    ///
    /// # Example
    /// ```ignore
    /// reader.read_file(&path)
    ///     .with_path_context("read input", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ApplicationError::InputNotFound(path.to_path_buf()),
            io::ErrorKind::InvalidData => MalformedInput::InvalidEncoding.into(),
            _ => ApplicationError::OperationFailed {
                context: format!("{}: {}", action, path.display()),
                source: Box::new(e),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn fail(kind: io::ErrorKind) -> ApplicationError {
        let result: io::Result<()> = Err(io::Error::new(kind, "boom"));
        result
            .with_path_context("read input", Path::new("tree.txt"))
            .unwrap_err()
    }

    #[test]
    fn not_found_names_the_path() {
        assert!(matches!(
            fail(io::ErrorKind::NotFound),
            ApplicationError::InputNotFound(p) if p == Path::new("tree.txt")
        ));
    }

    #[test]
    fn invalid_data_is_malformed_encoding() {
        assert!(matches!(
            fail(io::ErrorKind::InvalidData),
            ApplicationError::Domain(DomainError::MalformedInput(
                MalformedInput::InvalidEncoding
            ))
        ));
    }

    #[test]
    fn other_errors_keep_their_cause_in_the_message() {
        let err = fail(io::ErrorKind::PermissionDenied);
        assert_eq!(err.to_string(), "operation failed: read input: tree.txt: boom");
    }
}
