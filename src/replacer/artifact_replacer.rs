//! Orchestration of replacers over a manifest.

use super::binding::{self, BindingContext, DockerImageBinding};
use super::Replacer;
use crate::artifact::Artifact;
use crate::manifest::KubernetesManifest;
use std::collections::BTreeSet;

/// Outcome of [`ArtifactReplacer::replace_all`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceResult {
    /// The rewritten manifest. Equal to the input when nothing was bound.
    pub manifest: KubernetesManifest,
    /// Every artifact written into `manifest` at least once.
    pub bound_artifacts: BTreeSet<Artifact>,
}

impl ReplaceResult {
    /// Whether any reference was rewritten.
    #[must_use]
    pub fn has_bindings(&self) -> bool {
        !self.bound_artifacts.is_empty()
    }

    /// Split into the manifest and the bound set.
    #[must_use]
    pub fn into_parts(self) -> (KubernetesManifest, BTreeSet<Artifact>) {
        (self.manifest, self.bound_artifacts)
    }
}

/// Runs an ordered list of [`Replacer`]s over manifests.
///
/// An `ArtifactReplacer` holds no per-call state and can be shared freely
/// between threads.
#[derive(Debug, Clone)]
pub struct ArtifactReplacer {
    replacers: Vec<Replacer>,
}

impl Default for ArtifactReplacer {
    fn default() -> Self {
        Self::kubernetes_default()
    }
}

impl ArtifactReplacer {
    /// Create a replacer running `replacers` in the given order.
    #[must_use]
    pub const fn new(replacers: Vec<Replacer>) -> Self {
        Self {
            replacers,
        }
    }

    /// Every built-in replacer: images first, then config map and secret
    /// references, then autoscaler scale targets.
    #[must_use]
    pub fn kubernetes_default() -> Self {
        let mut replacers = vec![
            Replacer::docker_image(),
            Replacer::config_map_volume(),
            Replacer::secret_volume(),
            Replacer::config_map_projected_volume(),
            Replacer::secret_projected_volume(),
            Replacer::config_map_key_value(),
            Replacer::secret_key_value(),
            Replacer::config_map_env(),
            Replacer::secret_env(),
        ];
        replacers.extend(Replacer::scale_targets());
        Self::new(replacers)
    }

    /// The configured replacers, in run order.
    #[must_use]
    pub fn replacers(&self) -> &[Replacer] {
        &self.replacers
    }

    /// Every artifact referenced by `manifest`, deduplicated.
    ///
    /// Images are reported by their parsed name with the literal reference.
    #[must_use]
    pub fn find_all(&self, manifest: &KubernetesManifest) -> BTreeSet<Artifact> {
        let found: BTreeSet<Artifact> = self
            .replacers
            .iter()
            .flat_map(|replacer| replacer.locate(manifest))
            .map(|candidate| candidate.artifact)
            .collect();

        tracing::debug!("Found {} artifact reference(s) in {}", found.len(), manifest.full_resource_name());
        found
    }

    /// Rewrite every reference in `manifest` that an artifact in `available`
    /// binds to.
    ///
    /// The input is never modified. Replacers run in order, each over the
    /// result of the previous one; within a replacer, references are bound in
    /// document order and the first eligible artifact in `available` wins.
    /// Artifacts that bind nothing do not appear in the result.
    #[must_use]
    pub fn replace_all(
        &self,
        mode: DockerImageBinding,
        manifest: &KubernetesManifest,
        available: &[Artifact],
        namespace: &str,
        account: &str,
    ) -> ReplaceResult {
        let context = BindingContext::new(mode, namespace, account);
        let mut working = manifest.clone();
        let mut bound_artifacts = BTreeSet::new();

        if available.is_empty() {
            tracing::debug!("No artifacts available to bind into {}", manifest.full_resource_name());
            return ReplaceResult {
                manifest: working,
                bound_artifacts,
            };
        }

        for replacer in &self.replacers {
            for candidate in replacer.locate(&working) {
                let Some(artifact) = binding::select_artifact(&candidate, available, &context) else {
                    tracing::trace!(
                        "No artifact binds {} '{}' at {}",
                        replacer.description(),
                        candidate.artifact.reference(),
                        candidate.location
                    );
                    continue;
                };

                if replacer.rewrite(&mut working, &candidate.location, artifact) {
                    tracing::debug!(
                        "Bound {} '{}' at {} to {}",
                        replacer.description(),
                        candidate.artifact.reference(),
                        candidate.location,
                        artifact.reference()
                    );
                    bound_artifacts.insert(artifact.clone());
                }
            }
        }

        if !bound_artifacts.is_empty() {
            tracing::info!(
                "Bound {} artifact(s) into {}",
                bound_artifacts.len(),
                manifest.full_resource_name()
            );
        }

        ReplaceResult {
            manifest: working,
            bound_artifacts,
        }
    }
}
