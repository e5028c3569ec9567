//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the fixture core:
//! - Logging and tracing infrastructure
//! - Configuration management (builder and YAML loading)
//! - Event bus for progress reporting
//!
//! ## Overview
//!
//! This crate contains the runtime utilities every other core crate depends
//! on. It establishes the configuration types, logging conventions, and event
//! broadcasting used throughout the pipeline.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
