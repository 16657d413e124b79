//! Integration test suite for artibind
//!
//! End-to-end tests running the `artibind` binary against files on disk.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **find**: `artibind find` output for single and multi-document files
//! - **replace**: `artibind replace` rewriting, scoping flags and output files
//! - **config**: configuration file and environment overrides
//! - **error_scenarios**: user-facing failures and exit codes

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod replace;
