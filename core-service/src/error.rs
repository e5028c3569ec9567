use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error(transparent)]
    Config(#[from] core_runtime::Error),

    #[error("Catalog error: {0}")]
    Catalog(#[from] core_catalog::CatalogError),

    #[error("Fixture error: {0}")]
    Fixture(#[from] core_fixtures::FixtureError),

    #[error("Failed to generate {} file(s): {}", failed.len(), failed.join(", "))]
    Generation { failed: Vec<String> },

    #[error("Sync error: {0}")]
    Sync(#[from] core_sync::SyncError),
}

impl CoreError {
    /// True for errors caused by the configuration or the size list, as
    /// opposed to I/O or remote failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Config(_) | CoreError::Catalog(_))
    }

    /// Process exit code a host should report: 2 for validation errors,
    /// 1 for everything else.
    pub fn exit_code(&self) -> i32 {
        if self.is_validation() {
            2
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
