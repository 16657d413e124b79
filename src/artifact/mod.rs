//! Artifacts: the version-pinned units that get bound into manifests.
//!
//! An [`Artifact`] names one resolvable thing (a docker image, a config map, a
//! secret, a deployment) together with the concrete `reference` that should be
//! written into a manifest when the artifact is bound. Artifacts are immutable
//! values; they are assembled with [`Artifact::builder`] and compared
//! structurally.
//!
//! Matching identity is `(type, name)`. `location` and the `account` metadata
//! entry scope cluster-internal artifacts (see [`ArtifactType::is_kubernetes`]).
//!
//! # Examples
//!
//! ```rust
//! use artibind::artifact::{Artifact, ArtifactType};
//!
//! let config_map = Artifact::builder()
//!     .artifact_type(ArtifactType::ConfigMap)
//!     .name("my-config-map")
//!     .version("v003")
//!     .reference("my-config-map-v003")
//!     .location("ns")
//!     .put_metadata("account", "my-account")
//!     .build();
//!
//! assert_eq!(config_map.account(), Some("my-account"));
//! assert!(config_map.artifact_type().is_kubernetes());
//! ```

pub mod docker_image;
mod pool;

use crate::constants::{ACCOUNT_METADATA_KEY, KUBERNETES_TYPE_PREFIX};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of artifact, serialized as its canonical type string.
///
/// Known kinds get their own variant; any other string is preserved verbatim
/// in [`ArtifactType::Other`] so pools may carry artifacts this crate has no
/// replacer for.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ArtifactType {
    /// `docker/image`
    DockerImage,
    /// `kubernetes/configMap`
    ConfigMap,
    /// `kubernetes/secret`
    Secret,
    /// `kubernetes/deployment`
    Deployment,
    /// `kubernetes/replicaSet`
    ReplicaSet,
    /// `kubernetes/statefulSet`
    StatefulSet,
    /// Any other type string
    Other(String),
}

impl ArtifactType {
    /// Canonical type string, e.g. `kubernetes/configMap`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::DockerImage => "docker/image",
            Self::ConfigMap => "kubernetes/configMap",
            Self::Secret => "kubernetes/secret",
            Self::Deployment => "kubernetes/deployment",
            Self::ReplicaSet => "kubernetes/replicaSet",
            Self::StatefulSet => "kubernetes/statefulSet",
            Self::Other(other) => other,
        }
    }

    /// Whether this is a cluster-internal (`kubernetes/*`) artifact type.
    ///
    /// Only these are subject to namespace and account scoping when binding.
    #[must_use]
    pub fn is_kubernetes(&self) -> bool {
        self.as_str().starts_with(KUBERNETES_TYPE_PREFIX)
    }
}

impl From<&str> for ArtifactType {
    fn from(value: &str) -> Self {
        match value {
            "docker/image" => Self::DockerImage,
            "kubernetes/configMap" => Self::ConfigMap,
            "kubernetes/secret" => Self::Secret,
            "kubernetes/deployment" => Self::Deployment,
            "kubernetes/replicaSet" => Self::ReplicaSet,
            "kubernetes/statefulSet" => Self::StatefulSet,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ArtifactType {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<ArtifactType> for String {
    fn from(value: ArtifactType) -> Self {
        match value {
            ArtifactType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One resolvable, version-pinned unit.
///
/// Empty strings for `location`, `version` and metadata values are treated
/// the same as absent values by the accessors, since upstream pipelines often
/// emit `""` for "not set".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "type")]
    artifact_type: ArtifactType,
    name: String,
    #[serde(default)]
    reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    location: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl Artifact {
    /// Start building an artifact.
    #[must_use]
    pub fn builder() -> ArtifactBuilder {
        ArtifactBuilder::default()
    }

    /// The artifact type.
    #[must_use]
    pub const fn artifact_type(&self) -> &ArtifactType {
        &self.artifact_type
    }

    /// The name used for matching, e.g. `nginx` or `my-config-map`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The concrete value written into a manifest on bind.
    #[must_use]
    pub fn reference(&self) -> &str {
        &self.reference
    }

    /// Version label, e.g. `v003`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        non_empty(self.version.as_deref())
    }

    /// Namespace-like scope of the artifact.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        non_empty(self.location.as_deref())
    }

    /// Free-form metadata.
    #[must_use]
    pub const fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// The `account` metadata entry, if set.
    #[must_use]
    pub fn account(&self) -> Option<&str> {
        non_empty(self.metadata.get(ACCOUNT_METADATA_KEY).map(String::as_str))
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.artifact_type, self.name)?;
        if !self.reference.is_empty() && self.reference != self.name {
            write!(f, " -> {}", self.reference)?;
        }
        Ok(())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Fluent builder for [`Artifact`].
#[derive(Debug, Clone, Default)]
pub struct ArtifactBuilder {
    artifact_type: Option<ArtifactType>,
    name: String,
    reference: String,
    version: Option<String>,
    location: Option<String>,
    metadata: BTreeMap<String, String>,
}

impl ArtifactBuilder {
    /// Set the type; accepts an [`ArtifactType`] or a type string.
    #[must_use]
    pub fn artifact_type(mut self, artifact_type: impl Into<ArtifactType>) -> Self {
        self.artifact_type = Some(artifact_type.into());
        self
    }

    /// Set the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the reference.
    #[must_use]
    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = reference.into();
        self
    }

    /// Set the version.
    #[must_use]
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Set the location (namespace).
    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add one metadata entry.
    #[must_use]
    pub fn put_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Finish the artifact. A missing type becomes an empty `Other` type.
    #[must_use]
    pub fn build(self) -> Artifact {
        Artifact {
            artifact_type: self.artifact_type.unwrap_or_else(|| ArtifactType::Other(String::new())),
            name: self.name,
            reference: self.reference,
            version: self.version,
            location: self.location,
            metadata: self.metadata,
        }
    }
}
