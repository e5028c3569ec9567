use crate::catalog::SizeBound;
use thiserror::Error;

/// Errors produced while parsing a single size string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SizeError {
    #[error("Invalid size format: '{raw}' (expected <number><KB|MB|GB>)")]
    InvalidFormat { raw: String },

    #[error("Size '{raw}' does not fit in 64 bits")]
    TooLarge { raw: String },
}

/// Catalog validation failures.
///
/// Every variant aborts the run; an inconsistent catalog never drives file
/// generation or remote deletion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Too many files: {count} configured, at most {limit} allowed per release")]
    TooManyFiles { count: usize, limit: usize },

    #[error("Invalid size: {0}")]
    InvalidSize(#[from] SizeError),

    #[error("Size '{raw}' ({bytes} bytes) is {bound} of {limit} bytes")]
    SizeOutOfRange {
        raw: String,
        bytes: u64,
        bound: SizeBound,
        limit: u64,
    },

    #[error("Duplicate size: '{first}' and '{second}' are both {bytes} bytes")]
    DuplicateSize {
        first: String,
        second: String,
        bytes: u64,
    },

    #[error("Size '{raw}' ({bytes} bytes) has no exact canonical name (nearest is '{canonical}')")]
    NotRepresentable {
        raw: String,
        bytes: u64,
        canonical: String,
    },

    #[error("Total catalog size exceeds {} bytes once '{raw}' is added", u64::MAX)]
    TotalTooLarge { raw: String },
}

pub type Result<T> = std::result::Result<T, CatalogError>;
