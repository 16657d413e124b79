//! In-memory document model for Kubernetes manifests.
//!
//! A [`KubernetesManifest`] is one resource object (a Deployment, ReplicaSet,
//! HorizontalPodAutoscaler, ...) held as a generic tree of mappings, sequences
//! and scalar leaves. Nothing here knows the Kubernetes schema: accessors take
//! dotted paths and return `None` whenever an intermediate field is absent or
//! has the wrong shape, so callers can chain lookups without handling errors.
//!
//! Manifests are values. The binding engine never mutates a manifest it was
//! handed; it clones it and rewrites the clone.
//!
//! # Examples
//!
//! ```rust
//! use artibind::manifest::KubernetesManifest;
//! use serde_json::json;
//!
//! let manifest = KubernetesManifest::from_value(json!({
//!     "apiVersion": "apps/v1",
//!     "kind": "Deployment",
//!     "metadata": { "name": "frontend", "namespace": "web" },
//!     "spec": { "replicas": 3 }
//! }))
//! .unwrap();
//!
//! assert_eq!(manifest.kind(), Some("Deployment"));
//! assert_eq!(manifest.namespace(), Some("web"));
//! assert_eq!(manifest.get("spec.replicas").and_then(|v| v.as_u64()), Some(3));
//! assert!(manifest.get("spec.template.spec").is_none());
//! ```

mod manifest_io;

pub use manifest_io::DocumentFormat;

use crate::core::ArtibindError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A single Kubernetes resource object.
///
/// The root is always a JSON object; [`KubernetesManifest::from_value`] rejects
/// anything else. Equality is structural, which is what the binder relies on
/// to promise that an unbound manifest comes back equal to its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct KubernetesManifest {
    root: Value,
}

impl KubernetesManifest {
    /// Wrap a JSON value as a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ArtibindError::InvalidManifest`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, ArtibindError> {
        if value.is_object() {
            Ok(Self {
                root: value,
            })
        } else {
            Err(ArtibindError::InvalidManifest {
                reason: format!("expected a mapping at the document root, found {}", kind_of(&value)),
            })
        }
    }

    /// Borrow the underlying document tree.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.root
    }

    /// Consume the manifest and return the document tree.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.root
    }

    /// The resource `kind`, e.g. `Deployment`.
    #[must_use]
    pub fn kind(&self) -> Option<&str> {
        self.get_str("kind")
    }

    /// The resource `apiVersion`, e.g. `apps/v1`.
    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.get_str("apiVersion")
    }

    /// `metadata.name`
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str("metadata.name")
    }

    /// `metadata.namespace`
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.get_str("metadata.namespace")
    }

    /// Human-readable `kind name` used in log output.
    #[must_use]
    pub fn full_resource_name(&self) -> String {
        let kind = self.kind().unwrap_or("<unknown kind>").to_lowercase();
        match self.name() {
            Some(name) => format!("{kind} {name}"),
            None => kind,
        }
    }

    /// Look up a dotted path of mapping keys.
    ///
    /// Numeric segments index into sequences, so `spec.containers.0.image`
    /// reaches the first container's image. Returns `None` as soon as a
    /// segment is missing or the node has the wrong shape.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&Value> {
        path.split('.').filter(|segment| !segment.is_empty()).try_fold(&self.root, |node, segment| {
            match node {
                Value::Object(map) => map.get(segment),
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                _ => None,
            }
        })
    }

    /// Look up a dotted path and return it if the leaf is a string.
    #[must_use]
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    /// Resolve an RFC 6901 JSON pointer.
    #[must_use]
    pub fn pointer(&self, pointer: &str) -> Option<&Value> {
        self.root.pointer(pointer)
    }

    /// Mutable access through an RFC 6901 JSON pointer.
    ///
    /// Only the binding engine writes into manifests, and only into its own
    /// working copy.
    pub(crate) fn pointer_mut(&mut self, pointer: &str) -> Option<&mut Value> {
        self.root.pointer_mut(pointer)
    }
}

impl TryFrom<Value> for KubernetesManifest {
    type Error = ArtibindError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<KubernetesManifest> for Value {
    fn from(manifest: KubernetesManifest) -> Self {
        manifest.root
    }
}

impl fmt::Display for KubernetesManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_resource_name())
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
