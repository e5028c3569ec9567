//! # Catalog Module
//!
//! Turns the configured list of human-readable sizes into a validated
//! [`Catalog`].
//!
//! ## Overview
//!
//! This module provides:
//! - Size parsing and canonical size names ([`size`])
//! - The single validation gate that produces a deduplicated, sorted catalog
//!   ([`catalog`])
//!
//! Every other component consumes a [`Catalog`]; none of them re-derive one
//! from raw strings.

pub mod catalog;
pub mod error;
pub mod size;

pub use catalog::{Catalog, CatalogEntry, CatalogValidator, SizeBound};
pub use error::{CatalogError, Result, SizeError};
pub use size::{canonicalize, format_bytes, parse, SizeUnit};
