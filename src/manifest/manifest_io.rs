//! Parsing and serialization of manifest documents.
//!
//! Manifests arrive as YAML or JSON text. JSON is a subset of YAML, so a single
//! YAML reader handles both, including multi-document streams separated by
//! `---`. Empty documents in a stream are skipped.

use super::KubernetesManifest;
use crate::core::ArtibindError;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

/// Output encoding for rendered manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum DocumentFormat {
    /// YAML, documents separated by `---`
    #[default]
    Yaml,
    /// Pretty-printed JSON; several manifests are rendered as a JSON array
    Json,
}

impl KubernetesManifest {
    /// Parse every document in a YAML or JSON stream.
    ///
    /// `source_name` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ArtibindError::ManifestParseError`] for syntax errors and
    /// [`ArtibindError::InvalidManifest`] for documents whose root is not a
    /// mapping.
    pub fn parse_documents(content: &str, source_name: &str) -> Result<Vec<Self>, ArtibindError> {
        let mut manifests = Vec::new();

        for document in serde_yaml::Deserializer::from_str(content) {
            let value = Value::deserialize(document).map_err(|e| {
                ArtibindError::ManifestParseError {
                    source_name: source_name.to_string(),
                    reason: e.to_string(),
                }
            })?;

            if value.is_null() {
                continue;
            }

            // A top-level JSON array is a list of manifests
            if let Value::Array(items) = value {
                for item in items {
                    manifests.push(Self::from_value(item)?);
                }
            } else {
                manifests.push(Self::from_value(value)?);
            }
        }

        tracing::debug!("Parsed {} manifest(s) from {}", manifests.len(), source_name);
        Ok(manifests)
    }

    /// Parse exactly one manifest from YAML or JSON text.
    ///
    /// # Errors
    ///
    /// Fails if the text does not contain exactly one manifest document.
    pub fn parse(content: &str) -> Result<Self, ArtibindError> {
        let mut manifests = Self::parse_documents(content, "<inline>")?;
        if manifests.len() != 1 {
            return Err(ArtibindError::InvalidManifest {
                reason: format!("expected exactly one document, found {}", manifests.len()),
            });
        }
        Ok(manifests.remove(0))
    }

    /// Read and parse every manifest in a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn load_all(path: &Path) -> Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest file {}", path.display()))?;

        Self::parse_documents(&content, &path.display().to_string())
            .with_context(|| format!("Failed to parse manifest file {}", path.display()))
    }

    /// Render a list of manifests in the requested format.
    ///
    /// # Errors
    ///
    /// Serialization of a JSON tree cannot fail in practice; errors from the
    /// underlying serializers are still propagated.
    pub fn render_all(manifests: &[Self], format: DocumentFormat) -> Result<String, ArtibindError> {
        match format {
            DocumentFormat::Yaml => {
                let mut out = String::new();
                for (i, manifest) in manifests.iter().enumerate() {
                    if i > 0 {
                        out.push_str("---\n");
                    }
                    out.push_str(&serde_yaml::to_string(manifest.as_value())?);
                }
                Ok(out)
            }
            DocumentFormat::Json => {
                let mut out = if let [single] = manifests {
                    serde_json::to_string_pretty(single.as_value())?
                } else {
                    let values: Vec<&Value> = manifests.iter().map(Self::as_value).collect();
                    serde_json::to_string_pretty(&values)?
                };
                out.push('\n');
                Ok(out)
            }
        }
    }
}
