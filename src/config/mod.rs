//! User configuration for artibind.
//!
//! Configuration is a small TOML file holding the defaults a replace pass runs
//! with when the command line does not say otherwise:
//!
//! ```toml
//! [artifact-binding]
//! docker-image = "match-name-only"
//!
//! [defaults]
//! namespace = "staging"
//! account = "my-k8s-account"
//! ```
//!
//! **Location**, first match wins:
//! - `--config <path>` on the command line
//! - the `ARTIBIND_CONFIG` environment variable
//! - Unix/macOS: `~/.artibind/config.toml`
//! - Windows: `%LOCALAPPDATA%\artibind\config.toml`
//!
//! A missing file is not an error; every field has a default. The
//! `ARTIBIND_DOCKER_IMAGE_BINDING` environment variable overrides the docker
//! image binding mode from the file.

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DOCKER_IMAGE_BINDING_ENV,
    WINDOWS_CONFIG_DIR_NAME,
};
use crate::core::ArtibindError;
use crate::replacer::DockerImageBinding;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// How artifacts are bound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ArtifactBindingConfig {
    /// Docker image binding mode
    pub docker_image: DockerImageBinding,
}

/// Ambient scope used when the command line gives none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Namespace manifests are deployed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Account manifests are deployed with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BinderConfig {
    /// `[artifact-binding]` table
    pub artifact_binding: ArtifactBindingConfig,
    /// `[defaults]` table
    pub defaults: DefaultsConfig,
}

impl BinderConfig {
    /// Load configuration from `path`, or from the default location when
    /// `None`. Environment overrides are applied afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or if
    /// the binding mode override is not a known mode.
    pub async fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };

        let mut config = if path.exists() {
            Self::load_from(&path).await?
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid
    /// configuration TOML.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to parse config from {}", path.display()))
    }

    /// Parse configuration TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ArtibindError::TomlError`] on invalid TOML or unknown binding
    /// modes.
    pub fn parse(content: &str) -> Result<Self, ArtibindError> {
        Ok(toml::from_str(content)?)
    }

    /// Where configuration is read from when `--config` is not given.
    ///
    /// # Errors
    ///
    /// Returns an error if the home (or local data, on Windows) directory
    /// cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }

        let path = if cfg!(target_os = "windows") {
            config_file_under(dirs::data_local_dir(), WINDOWS_CONFIG_DIR_NAME, "local data")?
        } else {
            config_file_under(dirs::home_dir(), CONFIG_DIR_NAME, "home")?
        };

        Ok(path)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ArtibindError> {
        if let Ok(mode) = std::env::var(DOCKER_IMAGE_BINDING_ENV)
            && !mode.trim().is_empty()
        {
            self.artifact_binding.docker_image = mode.parse()?;
            tracing::debug!(
                "Docker image binding set to {} from {}",
                self.artifact_binding.docker_image,
                DOCKER_IMAGE_BINDING_ENV
            );
        }
        Ok(())
    }

    /// Configured namespace, or empty.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.defaults.namespace.as_deref().unwrap_or_default()
    }

    /// Configured account, or empty.
    #[must_use]
    pub fn account(&self) -> &str {
        self.defaults.account.as_deref().unwrap_or_default()
    }
}

fn config_file_under(
    base: Option<PathBuf>,
    dir_name: &str,
    base_label: &str,
) -> Result<PathBuf, ArtibindError> {
    let base = base.ok_or_else(|| ArtibindError::ConfigError {
        message: format!("Unable to determine {base_label} directory; pass --config or set {CONFIG_PATH_ENV}"),
    })?;
    Ok(base.join(dir_name).join(CONFIG_FILE_NAME))
}
