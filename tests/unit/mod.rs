//! Unit test suite for the binding engine
//!
//! These tests drive the public library API directly, without the CLI.
//!
//! ```bash
//! cargo test --test unit
//! ```

mod workload_coverage_tests;
