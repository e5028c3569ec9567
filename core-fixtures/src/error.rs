use bridge_traits::error::BridgeError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: BridgeError,
    },

    #[error("{} has {actual} bytes after writing, expected {expected}", path.display())]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    #[error("{} exists but is not a regular file", path.display())]
    NotAFile { path: PathBuf },
}

impl FixtureError {
    pub(crate) fn io(path: &Path, source: impl Into<BridgeError>) -> Self {
        FixtureError::Io {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    /// The file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            FixtureError::Io { path, .. }
            | FixtureError::SizeMismatch { path, .. }
            | FixtureError::NotAFile { path } => path,
        }
    }
}

pub type Result<T> = std::result::Result<T, FixtureError>;
