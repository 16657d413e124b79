//! Loading artifact pools from files.
//!
//! A pool is an ordered list of artifacts, written as a YAML or JSON sequence:
//!
//! ```yaml
//! - type: docker/image
//!   name: nginx
//!   reference: nginx:1.19.1
//! - type: kubernetes/configMap
//!   name: my-config-map
//!   reference: my-config-map-v003
//!   version: v003
//!   location: ns
//!   metadata:
//!     account: my-account
//! ```
//!
//! Order matters: when several artifacts could bind the same reference the
//! first one wins.

use super::Artifact;
use crate::core::ArtibindError;
use anyhow::{Context, Result};
use std::path::Path;

impl Artifact {
    /// Parse an ordered artifact pool from YAML or JSON text.
    ///
    /// An empty document is an empty pool.
    ///
    /// # Errors
    ///
    /// Returns [`ArtibindError::ArtifactPoolParseError`] if the text is not a
    /// sequence of artifact objects.
    pub fn parse_pool(content: &str, file: &str) -> Result<Vec<Self>, ArtibindError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let pool: Option<Vec<Self>> =
            serde_yaml::from_str(content).map_err(|e| ArtibindError::ArtifactPoolParseError {
                file: file.to_string(),
                reason: e.to_string(),
            })?;

        let pool = pool.unwrap_or_default();
        tracing::debug!("Loaded {} artifact(s) from {}", pool.len(), file);
        Ok(pool)
    }

    /// Read and parse an artifact pool file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_pool(path: &Path) -> Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read artifact file {}", path.display()))?;

        Self::parse_pool(&content, &path.display().to_string())
            .with_context(|| format!("Failed to load artifacts from {}", path.display()))
    }
}
