//! `artibind replace`: bind an artifact pool into a manifest file.

use crate::artifact::Artifact;
use crate::config::BinderConfig;
use crate::manifest::{DocumentFormat, KubernetesManifest};
use crate::replacer::{ArtifactReplacer, DockerImageBinding};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Rewrite artifact references in a manifest file.
///
/// Every document in the file is processed. The rewritten manifests go to
/// stdout (or `--output`) and the bound artifacts are listed on stderr.
#[derive(Args, Debug)]
pub struct ReplaceCommand {
    /// Manifest file (YAML or JSON, multi-document allowed)
    manifest: PathBuf,

    /// Ordered artifact pool (YAML or JSON sequence); earlier entries win
    #[arg(short, long)]
    artifacts: PathBuf,

    /// Namespace the manifests are deployed to.
    ///
    /// Defaults to each document's `metadata.namespace`, then the configured
    /// default namespace.
    #[arg(short, long)]
    namespace: Option<String>,

    /// Account the manifests are deployed with
    #[arg(long)]
    account: Option<String>,

    /// Docker image binding mode: match-name-and-tag or match-name-only
    #[arg(short, long)]
    binding: Option<DockerImageBinding>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: DocumentFormat,

    /// Write the rewritten manifests here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// Rewritten manifests and everything bound into them.
#[derive(Debug)]
pub(crate) struct ReplaceOutcome {
    pub manifests: Vec<KubernetesManifest>,
    pub bound_artifacts: BTreeSet<Artifact>,
}

impl ReplaceCommand {
    /// Run the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or artifact file cannot be read or
    /// parsed, or if the output cannot be written.
    pub async fn execute(self, config: &BinderConfig, quiet: bool) -> Result<()> {
        let outcome = self.bind(config)?;
        let rendered = KubernetesManifest::render_all(&outcome.manifests, self.format)?;

        match &self.output {
            Some(path) => tokio::fs::write(path, rendered)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?,
            None => print!("{rendered}"),
        }

        if !quiet {
            report_bound(&outcome.bound_artifacts);
        }
        Ok(())
    }

    pub(crate) fn bind(&self, config: &BinderConfig) -> Result<ReplaceOutcome> {
        let manifests = KubernetesManifest::load_all(&self.manifest)?;
        let pool = Artifact::load_pool(&self.artifacts)?;
        let mode = self.binding.unwrap_or(config.artifact_binding.docker_image);
        let account = self.account.as_deref().unwrap_or_else(|| config.account());
        let replacer = ArtifactReplacer::kubernetes_default();

        tracing::debug!(
            "Binding {} artifact(s) into {} document(s) from {} ({} binding)",
            pool.len(),
            manifests.len(),
            self.manifest.display(),
            mode
        );

        let mut bound_artifacts = BTreeSet::new();
        let mut rewritten = Vec::with_capacity(manifests.len());
        for manifest in &manifests {
            let namespace = self
                .namespace
                .as_deref()
                .or_else(|| manifest.namespace())
                .unwrap_or_else(|| config.namespace());

            let result = replacer.replace_all(mode, manifest, &pool, namespace, account);
            let (manifest, bound) = result.into_parts();
            bound_artifacts.extend(bound);
            rewritten.push(manifest);
        }

        Ok(ReplaceOutcome {
            manifests: rewritten,
            bound_artifacts,
        })
    }
}

fn report_bound(bound: &BTreeSet<Artifact>) {
    if bound.is_empty() {
        eprintln!("{}", "No artifacts bound".yellow());
        return;
    }

    eprintln!("{} {} artifact(s):", "Bound".green().bold(), bound.len());
    for artifact in bound {
        eprintln!("  {artifact}");
    }
}
