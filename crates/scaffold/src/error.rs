//! Error types for plugin generation
//!
//! Validation errors (identifier, destination, features, stubs) are raised
//! before the destination tree is touched. `Io` is the only error that can
//! occur mid-run, and it always names the path that failed.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scaffold-specific errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Invalid plugin identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Unknown feature: {0}")]
    UnknownFeature(String),

    #[error("Stub not found: {}", .0.display())]
    StubNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScaffoldError {
    /// Wrap an IO error with the path it happened on
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Convert a walkdir error, keeping the failing path when walkdir knows it
    pub fn walk(root: &Path, err: walkdir::Error) -> Self {
        let path = err.path().unwrap_or(root).to_path_buf();
        let source = err
            .into_io_error()
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "filesystem loop detected"));
        Self::Io { path, source }
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
