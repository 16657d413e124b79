//! Command-line interface for artibind.
//!
//! # Available Commands
//!
//! - `find` - List the artifacts referenced by manifests
//! - `replace` - Bind a pool of version-pinned artifacts into a manifest file
//!
//! # Examples
//!
//! ```bash
//! # What does this chart reference?
//! artibind find rendered/*.yaml
//!
//! # Pin images and config maps for a deploy
//! artibind replace deployment.yaml --artifacts pool.yaml --namespace staging --account prod-k8s
//!
//! # Leave explicitly tagged images alone
//! artibind replace deployment.yaml --artifacts pool.yaml --binding match-name-only
//! ```
//!
//! # Logging
//!
//! Diagnostics go to stderr through `tracing`. `--verbose` enables debug
//! output, `--quiet` turns it off, and `RUST_LOG` overrides both.

mod find;
mod replace;

use crate::config::BinderConfig;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use find::FindCommand;
pub use replace::ReplaceCommand;

/// Runtime configuration for CLI execution, derived from the global flags.
///
/// Kept separate from [`Cli`] so tests and programmatic callers can run a
/// command without going through argument parsing.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter used when `RUST_LOG` is not set. `None` disables logging.
    pub log_level: Option<String>,
    /// Suppress informational output on stderr
    pub quiet: bool,
    /// Explicit configuration file
    pub config_path: Option<PathBuf>,
}

impl CliConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the global `tracing` subscriber, writing to stderr.
    ///
    /// Does nothing if a subscriber is already installed.
    pub fn init_logging(&self) {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else if let Some(level) = &self.log_level {
            EnvFilter::new(level)
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Bind version-pinned artifacts into Kubernetes manifests.
#[derive(Parser)]
#[command(
    name = "artibind",
    about = "Bind version-pinned artifacts into Kubernetes manifests",
    version,
    long_about = "artibind finds container images, config maps, secrets and autoscaler targets \
                  referenced by Kubernetes manifests and rewrites them to the artifacts you supply."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress logging and the bound artifact summary.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the configuration file.
    ///
    /// Defaults to `$ARTIBIND_CONFIG`, then `~/.artibind/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List artifacts referenced by manifests
    Find(FindCommand),

    /// Rewrite artifact references in a manifest file
    Replace(ReplaceCommand),
}

impl Cli {
    /// Execute the parsed command line.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input files or output cannot be
    /// read, parsed or written.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config();
        self.execute_with_config(config).await
    }

    /// Translate global flags into a [`CliConfig`].
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        CliConfig {
            log_level,
            quiet: self.quiet,
            config_path: self.config.clone(),
        }
    }

    /// Execute with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`Cli::execute`].
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        config.init_logging();

        match self.command {
            Commands::Find(cmd) => cmd.execute().await,
            Commands::Replace(cmd) => {
                let binder_config = BinderConfig::load_with_optional(config.config_path.clone()).await?;
                cmd.execute(&binder_config, config.quiet).await
            }
        }
    }
}
