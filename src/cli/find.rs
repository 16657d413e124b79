//! `artibind find`: report the artifacts manifests reference.

use crate::artifact::Artifact;
use crate::manifest::{DocumentFormat, KubernetesManifest};
use crate::replacer::ArtifactReplacer;
use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// List artifacts referenced by manifests.
#[derive(Args, Debug)]
pub struct FindCommand {
    /// Manifest files (YAML or JSON, multi-document allowed)
    #[arg(required = true)]
    manifests: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: DocumentFormat,
}

/// Artifacts found in one manifest document.
#[derive(Debug, Serialize)]
struct FoundArtifacts {
    source: String,
    resource: String,
    artifacts: Vec<Artifact>,
}

impl FindCommand {
    /// Run the command, printing results to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if a manifest file cannot be read or parsed.
    pub async fn execute(self) -> Result<()> {
        let report = self.collect()?;
        let rendered = match self.format {
            DocumentFormat::Yaml => serde_yaml::to_string(&report)?,
            DocumentFormat::Json => {
                let mut out = serde_json::to_string_pretty(&report)?;
                out.push('\n');
                out
            }
        };
        print!("{rendered}");
        Ok(())
    }

    fn collect(&self) -> Result<Vec<FoundArtifacts>> {
        let replacer = ArtifactReplacer::kubernetes_default();
        let mut report = Vec::new();

        for path in &self.manifests {
            let manifests = KubernetesManifest::load_all(path)
                .with_context(|| format!("Failed to scan {}", path.display()))?;
            for manifest in &manifests {
                report.push(FoundArtifacts {
                    source: path.display().to_string(),
                    resource: manifest.full_resource_name(),
                    artifacts: replacer.find_all(manifest).into_iter().collect(),
                });
            }
        }

        Ok(report)
    }
}
