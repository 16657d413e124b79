//! Artifact replacement engine.
//!
//! This module finds references to mutable artifacts inside a
//! [`KubernetesManifest`] and rewrites them to caller-supplied, version-pinned
//! artifacts. It is made of three layers:
//!
//! - [`Replacer`]: one strategy per kind of reference (container images,
//!   config map and secret references, autoscaler scale targets). A replacer
//!   is plain data: a [`ReplacerKind`], the artifact type it produces and the
//!   [`PathPattern`]s where such references live.
//! - [`binding`]: the policy choosing which pool artifact, if any, binds to a
//!   located reference.
//! - [`ArtifactReplacer`]: the orchestrator running an ordered list of
//!   replacers over a manifest.
//!
//! Nothing in this module returns an error. A missing field, an unparseable
//! image reference or an unsupported scale target kind yields no candidate,
//! and a candidate without an eligible artifact is left untouched.
//!
//! # Examples
//!
//! ```rust
//! use artibind::artifact::{Artifact, ArtifactType};
//! use artibind::manifest::KubernetesManifest;
//! use artibind::replacer::{ArtifactReplacer, DockerImageBinding, Replacer};
//!
//! let manifest = KubernetesManifest::parse(r"
//! kind: Deployment
//! metadata: { name: web }
//! spec:
//!   template:
//!     spec:
//!       containers:
//!         - name: web
//!           image: nginx:1.18.0
//! ").unwrap();
//!
//! let nginx = Artifact::builder()
//!     .artifact_type(ArtifactType::DockerImage)
//!     .name("nginx")
//!     .reference("nginx:1.19.1")
//!     .build();
//!
//! let replacer = ArtifactReplacer::new(vec![Replacer::docker_image()]);
//! let result = replacer.replace_all(
//!     DockerImageBinding::MatchNameAndTag,
//!     &manifest,
//!     &[nginx.clone()],
//!     "default",
//!     "my-account",
//! );
//!
//! assert_eq!(
//!     result.manifest.get_str("spec.template.spec.containers.0.image"),
//!     Some("nginx:1.19.1")
//! );
//! assert!(result.bound_artifacts.contains(&nginx));
//! ```

mod artifact_replacer;
pub mod binding;
mod path;

pub use artifact_replacer::{ArtifactReplacer, ReplaceResult};
pub use binding::{BindingContext, DockerImageBinding};
pub use path::{Location, PathPattern};

use crate::artifact::docker_image::ImageReference;
use crate::artifact::{Artifact, ArtifactType};
use crate::manifest::KubernetesManifest;
use serde_json::Value;
use std::collections::HashSet;

/// Where a pod spec sits in the workload kinds we understand: a bare Pod,
/// anything with a pod template, and a CronJob's job template.
const POD_SPEC_ROOTS: &[&str] = &["spec", "spec.template.spec", "spec.jobTemplate.spec.template.spec"];

/// Container lists inside a pod spec. Both are always scanned.
const CONTAINER_LISTS: &[&str] = &["containers", "initContainers"];

/// Scale target kinds an autoscaler may point at, with the artifact type each maps to.
pub const SCALE_TARGETS: &[(&str, ArtifactType)] = &[
    ("Deployment", ArtifactType::Deployment),
    ("ReplicaSet", ArtifactType::ReplicaSet),
    ("StatefulSet", ArtifactType::StatefulSet),
];

/// How a replacer reads and writes the references it locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacerKind {
    /// A container image reference; the name is parsed out of the reference.
    DockerImage,
    /// A plain object name (config map or secret); name and reference coincide.
    NamedReference,
    /// An autoscaler `scaleTargetRef` of the given kind. Discovery only.
    ScaleTarget {
        /// The `kind` the target must have
        target_kind: &'static str,
    },
}

/// A reference located in a manifest, ready for the binding policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Where the reference sits
    pub location: Location,
    /// The reference expressed as an artifact
    pub artifact: Artifact,
    /// Whether the manifest pins an explicit image tag here
    pub pinned: bool,
}

/// A strategy for one kind of artifact reference.
#[derive(Debug, Clone)]
pub struct Replacer {
    description: &'static str,
    kind: ReplacerKind,
    artifact_type: ArtifactType,
    paths: Vec<PathPattern>,
}

impl Replacer {
    fn new(
        description: &'static str,
        kind: ReplacerKind,
        artifact_type: ArtifactType,
        paths: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            description,
            kind,
            artifact_type,
            paths: paths.into_iter().map(|p| PathPattern::parse(&p)).collect(),
        }
    }

    /// Images of every container and init container.
    #[must_use]
    pub fn docker_image() -> Self {
        Self::new("docker image", ReplacerKind::DockerImage, ArtifactType::DockerImage, container_paths("image"))
    }

    /// `envFrom[].configMapRef.name` of every container.
    #[must_use]
    pub fn config_map_env() -> Self {
        Self::named("config map env source", ArtifactType::ConfigMap, container_paths("envFrom[*].configMapRef.name"))
    }

    /// `envFrom[].secretRef.name` of every container.
    #[must_use]
    pub fn secret_env() -> Self {
        Self::named("secret env source", ArtifactType::Secret, container_paths("envFrom[*].secretRef.name"))
    }

    /// `env[].valueFrom.configMapKeyRef.name` of every container.
    #[must_use]
    pub fn config_map_key_value() -> Self {
        Self::named(
            "config map key reference",
            ArtifactType::ConfigMap,
            container_paths("env[*].valueFrom.configMapKeyRef.name"),
        )
    }

    /// `env[].valueFrom.secretKeyRef.name` of every container.
    #[must_use]
    pub fn secret_key_value() -> Self {
        Self::named(
            "secret key reference",
            ArtifactType::Secret,
            container_paths("env[*].valueFrom.secretKeyRef.name"),
        )
    }

    /// `volumes[].configMap.name`
    #[must_use]
    pub fn config_map_volume() -> Self {
        Self::named("config map volume", ArtifactType::ConfigMap, volume_paths("configMap.name"))
    }

    /// `volumes[].secret.secretName`
    #[must_use]
    pub fn secret_volume() -> Self {
        Self::named("secret volume", ArtifactType::Secret, volume_paths("secret.secretName"))
    }

    /// `volumes[].projected.sources[].configMap.name`
    #[must_use]
    pub fn config_map_projected_volume() -> Self {
        Self::named(
            "config map projected volume",
            ArtifactType::ConfigMap,
            volume_paths("projected.sources[*].configMap.name"),
        )
    }

    /// `volumes[].projected.sources[].secret.name`
    #[must_use]
    pub fn secret_projected_volume() -> Self {
        Self::named(
            "secret projected volume",
            ArtifactType::Secret,
            volume_paths("projected.sources[*].secret.name"),
        )
    }

    /// Autoscaler target replacer for `kind`, if it is in [`SCALE_TARGETS`].
    #[must_use]
    pub fn scale_target(kind: &str) -> Option<Self> {
        SCALE_TARGETS
            .iter()
            .find(|(target_kind, _)| *target_kind == kind)
            .map(|(target_kind, artifact_type)| Self::autoscaler_target(target_kind, artifact_type.clone()))
    }

    /// One autoscaler target replacer per entry of [`SCALE_TARGETS`], in table order.
    pub fn scale_targets() -> impl Iterator<Item = Self> {
        SCALE_TARGETS
            .iter()
            .map(|(target_kind, artifact_type)| Self::autoscaler_target(target_kind, artifact_type.clone()))
    }

    fn autoscaler_target(target_kind: &'static str, artifact_type: ArtifactType) -> Self {
        Self::new(
            "autoscaler target",
            ReplacerKind::ScaleTarget {
                target_kind,
            },
            artifact_type,
            ["spec.scaleTargetRef".to_string()],
        )
    }

    fn named(description: &'static str, artifact_type: ArtifactType, paths: Vec<String>) -> Self {
        Self::new(description, ReplacerKind::NamedReference, artifact_type, paths)
    }

    /// Short human-readable description, used in logs.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// How this replacer reads and writes references.
    #[must_use]
    pub const fn kind(&self) -> ReplacerKind {
        self.kind
    }

    /// The artifact type this replacer produces and binds.
    #[must_use]
    pub const fn artifact_type(&self) -> &ArtifactType {
        &self.artifact_type
    }

    /// The path patterns this replacer scans.
    #[must_use]
    pub fn paths(&self) -> &[PathPattern] {
        &self.paths
    }

    /// Every reference of this replacer's kind in `manifest`, in path order
    /// and then document order. Each location appears at most once.
    #[must_use]
    pub fn locate(&self, manifest: &KubernetesManifest) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        self.paths
            .iter()
            .flat_map(|pattern| pattern.locate(manifest.as_value()))
            .filter(|location| seen.insert(location.clone()))
            .filter_map(|location| self.extract(manifest, location))
            .collect()
    }

    /// Read the reference at `location` as a candidate artifact.
    ///
    /// Returns `None` when the node is missing, has the wrong shape, holds a
    /// malformed image reference or names an autoscaler target of another kind.
    #[must_use]
    pub fn extract(&self, manifest: &KubernetesManifest, location: Location) -> Option<Candidate> {
        let node = manifest.pointer(location.pointer())?;
        let builder = Artifact::builder().artifact_type(self.artifact_type.clone());

        let (artifact, pinned) = match self.kind {
            ReplacerKind::DockerImage => {
                let reference = node.as_str()?;
                let Some(image) = ImageReference::parse(reference) else {
                    tracing::debug!("Skipping unparseable image reference '{}' at {}", reference, location);
                    return None;
                };
                (builder.name(image.artifact_name()).reference(reference).build(), image.has_explicit_tag())
            }
            ReplacerKind::NamedReference => {
                let name = node.as_str().filter(|n| !n.is_empty())?;
                (builder.name(name).reference(name).build(), false)
            }
            ReplacerKind::ScaleTarget {
                target_kind,
            } => {
                if node.get("kind").and_then(Value::as_str) != Some(target_kind) {
                    return None;
                }
                let name = node.get("name").and_then(Value::as_str).filter(|n| !n.is_empty())?;
                (builder.name(name).reference(name).build(), false)
            }
        };

        Some(Candidate {
            location,
            artifact,
            pinned,
        })
    }

    /// Write `artifact` at `location` in `manifest`.
    ///
    /// Returns whether the manifest was changed. Scale targets are never
    /// rewritten, and an artifact without a reference is never written.
    pub fn rewrite(
        &self,
        manifest: &mut KubernetesManifest,
        location: &Location,
        artifact: &Artifact,
    ) -> bool {
        match self.kind {
            ReplacerKind::ScaleTarget {
                ..
            } => false,
            ReplacerKind::DockerImage | ReplacerKind::NamedReference => {
                if artifact.reference().is_empty() {
                    tracing::warn!("Not binding {} at {}: artifact has no reference", artifact, location);
                    return false;
                }
                match manifest.pointer_mut(location.pointer()) {
                    Some(slot) => {
                        *slot = Value::String(artifact.reference().to_string());
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

fn container_paths(suffix: &str) -> Vec<String> {
    POD_SPEC_ROOTS
        .iter()
        .flat_map(|root| CONTAINER_LISTS.iter().map(move |list| format!("{root}.{list}[*].{suffix}")))
        .collect()
}

fn volume_paths(suffix: &str) -> Vec<String> {
    POD_SPEC_ROOTS.iter().map(|root| format!("{root}.volumes[*].{suffix}")).collect()
}
