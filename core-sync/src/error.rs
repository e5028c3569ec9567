use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyncError {
    /// The remote store could not be read; nothing was deleted.
    #[error("Remote error: {0}")]
    Remote(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
