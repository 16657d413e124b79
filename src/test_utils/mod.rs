//! Test utilities for artibind
//!
//! Helpers shared by unit and integration tests: one-time logging setup and
//! fluent builders for workloads, autoscalers and artifacts.
//!
//! # Example
//!
//! ```rust,no_run
//! use artibind::test_utils::{ContainerBuilder, WorkloadBuilder, image_artifact, init_test_logging};
//!
//! init_test_logging(None);
//! let deployment = WorkloadBuilder::deployment("web")
//!     .container(ContainerBuilder::new("web", "nginx"))
//!     .build();
//! let nginx = image_artifact("nginx", "nginx:1.19.1");
//! ```

pub mod fixtures;

pub use fixtures::{ContainerBuilder, WorkloadBuilder, hpa, image_artifact, kubernetes_artifact};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. With `None`, logging is enabled only
/// when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=artibind=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_ansi(true)
            .try_init();
    });
}
