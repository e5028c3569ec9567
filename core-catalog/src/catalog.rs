//! Catalog construction and validation.
//!
//! [`CatalogValidator::build`] is the one place raw size strings become a
//! [`Catalog`]. It checks, in order:
//!
//! 1. the number of entries against `max_files_per_release`
//! 2. each entry parses ([`CatalogError::InvalidSize`])
//! 3. each entry lies within `[min_file_size_bytes, max_file_size_bytes]`
//! 4. each entry has an exact canonical name ([`CatalogError::NotRepresentable`])
//! 5. no two entries share a byte count ([`CatalogError::DuplicateSize`])
//!
//! and then sorts the entries ascending by size. The first failure aborts
//! the build with the offending raw string echoed verbatim.
//!
//! Non-canonical spellings such as `"1024KB"` are accepted and normalized;
//! they are logged and listed by [`Catalog::style_violations`].

use crate::error::{CatalogError, Result};
use crate::size;
use core_runtime::config::{CatalogLimits, FixtureConfig};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{info, warn};

/// Which bound of the configured range an entry violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SizeBound {
    Minimum,
    Maximum,
}

impl fmt::Display for SizeBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeBound::Minimum => write!(f, "below the minimum"),
            SizeBound::Maximum => write!(f, "above the maximum"),
        }
    }
}

/// One validated fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    raw: String,
    canonical_size: String,
    bytes: u64,
    filename: String,
}

impl CatalogEntry {
    fn new(prefix: &str, raw: &str, bytes: u64, canonical_size: String) -> Self {
        Self {
            raw: raw.to_string(),
            filename: format!("{}-{}.bin", prefix, canonical_size),
            canonical_size,
            bytes,
        }
    }

    /// The size exactly as it was configured.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Normalized size token, e.g. `"1.5gb"`.
    pub fn canonical_size(&self) -> &str {
        &self.canonical_size
    }

    pub fn bytes(&self) -> u64 {
        self.bytes
    }

    /// `<project>-<canonical size>.bin`
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Whether the configured spelling already was the canonical one.
    ///
    /// Case and whitespace are ignored, so `"512 KB"` is canonical while
    /// `"1024KB"` and `"1.50GB"` are not.
    pub fn is_canonical(&self) -> bool {
        let normalized: String = self
            .raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        normalized == self.canonical_size
    }
}

/// Validated, deduplicated fixtures sorted ascending by size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    project_name: String,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }

    /// Sum of all entry sizes.
    ///
    /// Never overflows: [`CatalogValidator::build`] rejects catalogs whose
    /// total does not fit in a `u64`.
    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(CatalogEntry::bytes).sum()
    }

    pub fn get_by_filename(&self, filename: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|entry| entry.filename == filename)
    }

    /// Entries whose configured spelling differs from their canonical name.
    pub fn style_violations(&self) -> Vec<&CatalogEntry> {
        self.entries
            .iter()
            .filter(|entry| !entry.is_canonical())
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Builds catalogs for one project under one set of limits.
#[derive(Debug, Clone)]
pub struct CatalogValidator {
    project_name: String,
    limits: CatalogLimits,
}

impl CatalogValidator {
    pub fn new(project_name: impl Into<String>, limits: CatalogLimits) -> Self {
        Self {
            project_name: project_name.into(),
            limits,
        }
    }

    /// Validator for the project and limits of a loaded configuration.
    pub fn from_config(config: &FixtureConfig) -> Self {
        Self::new(config.project_name.clone(), config.limits)
    }

    pub fn limits(&self) -> &CatalogLimits {
        &self.limits
    }

    /// Validates `raw_sizes` and builds the catalog.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered, in input order.
    pub fn build<S: AsRef<str>>(&self, raw_sizes: &[S]) -> Result<Catalog> {
        if raw_sizes.len() > self.limits.max_files_per_release {
            return Err(CatalogError::TooManyFiles {
                count: raw_sizes.len(),
                limit: self.limits.max_files_per_release,
            });
        }

        let mut seen: HashMap<u64, &str> = HashMap::with_capacity(raw_sizes.len());
        let mut entries = Vec::with_capacity(raw_sizes.len());
        let mut total: u64 = 0;

        for raw in raw_sizes {
            let raw = raw.as_ref();
            let bytes = size::parse(raw)?;
            self.check_range(raw, bytes)?;

            let canonical = size::canonicalize(bytes);
            if size::parse(&canonical)? != bytes {
                return Err(CatalogError::NotRepresentable {
                    raw: raw.to_string(),
                    bytes,
                    canonical,
                });
            }

            if let Some(first) = seen.insert(bytes, raw) {
                return Err(CatalogError::DuplicateSize {
                    first: first.to_string(),
                    second: raw.to_string(),
                    bytes,
                });
            }

            total = total
                .checked_add(bytes)
                .ok_or_else(|| CatalogError::TotalTooLarge {
                    raw: raw.to_string(),
                })?;

            let entry = CatalogEntry::new(&self.project_name, raw, bytes, canonical);
            if !entry.is_canonical() {
                warn!(
                    raw = entry.raw(),
                    canonical = entry.canonical_size(),
                    "Size is not in canonical form; normalizing"
                );
            }
            entries.push(entry);
        }

        entries.sort_by_key(CatalogEntry::bytes);

        let catalog = Catalog {
            project_name: self.project_name.clone(),
            entries,
        };

        info!(
            project = catalog.project_name(),
            files = catalog.len(),
            total = %size::format_bytes(catalog.total_bytes()),
            "Catalog validated"
        );

        Ok(catalog)
    }

    fn check_range(&self, raw: &str, bytes: u64) -> Result<()> {
        let violation = if bytes < self.limits.min_file_size_bytes {
            Some((SizeBound::Minimum, self.limits.min_file_size_bytes))
        } else if bytes > self.limits.max_file_size_bytes {
            Some((SizeBound::Maximum, self.limits.max_file_size_bytes))
        } else {
            None
        };

        match violation {
            Some((bound, limit)) => Err(CatalogError::SizeOutOfRange {
                raw: raw.to_string(),
                bytes,
                bound,
                limit,
            }),
            None => Ok(()),
        }
    }
}
