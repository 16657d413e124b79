//! Binding policy: which pool artifact, if any, replaces a located reference.
//!
//! The policy is a pure function of the candidate, the ordered pool and the
//! ambient [`BindingContext`]. A pool artifact is eligible when
//!
//! 1. its type and name equal the candidate's,
//! 2. for `kubernetes/*` types only, its `location` equals the ambient
//!    namespace and its `account` metadata equals the ambient account; an
//!    unset value on the artifact (or an empty ambient namespace) matches
//!    anything,
//! 3. the docker image binding mode allows overriding the candidate's pin.
//!
//! The first eligible artifact in pool order wins.

use super::Candidate;
use crate::artifact::Artifact;
use crate::core::ArtibindError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How docker image references with an existing tag are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DockerImageBinding {
    /// Replace any image whose name matches, tagged or not.
    #[default]
    MatchNameAndTag,
    /// Only replace images that carry no explicit tag; a tag in the manifest is
    /// treated as an intentional pin.
    MatchNameOnly,
}

impl DockerImageBinding {
    /// The configuration string for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MatchNameAndTag => "match-name-and-tag",
            Self::MatchNameOnly => "match-name-only",
        }
    }
}

impl FromStr for DockerImageBinding {
    type Err = ArtibindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match-name-and-tag" => Ok(Self::MatchNameAndTag),
            "match-name-only" => Ok(Self::MatchNameOnly),
            _ => Err(ArtibindError::InvalidBindingMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for DockerImageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ambient scope a replace pass runs in.
#[derive(Debug, Clone, Copy)]
pub struct BindingContext<'a> {
    /// Docker image binding mode
    pub mode: DockerImageBinding,
    /// Namespace the manifest is deployed to; empty means no namespace scoping
    pub namespace: &'a str,
    /// Account the manifest is deployed with
    pub account: &'a str,
}

impl<'a> BindingContext<'a> {
    /// Create a binding context.
    #[must_use]
    pub const fn new(mode: DockerImageBinding, namespace: &'a str, account: &'a str) -> Self {
        Self {
            mode,
            namespace,
            account,
        }
    }
}

/// Pick the artifact from `available` that should be bound to `candidate`.
///
/// Artifacts without a reference are never eligible. Returns `None` when no
/// artifact is eligible.
#[must_use]
pub fn select_artifact<'p>(
    candidate: &Candidate,
    available: &'p [Artifact],
    context: &BindingContext<'_>,
) -> Option<&'p Artifact> {
    if candidate.pinned && context.mode == DockerImageBinding::MatchNameOnly {
        tracing::trace!(
            "Keeping pinned reference {} ({} binding)",
            candidate.artifact.reference(),
            context.mode
        );
        return None;
    }

    available.iter().find(|artifact| {
        artifact.artifact_type() == candidate.artifact.artifact_type()
            && artifact.name() == candidate.artifact.name()
            && !artifact.reference().is_empty()
            && in_scope(artifact, context)
    })
}

/// Whether `artifact` may be bound in the ambient namespace and account.
#[must_use]
pub fn in_scope(artifact: &Artifact, context: &BindingContext<'_>) -> bool {
    if !artifact.artifact_type().is_kubernetes() {
        return true;
    }

    let namespace_matches = context.namespace.is_empty()
        || artifact.location().is_none_or(|location| location == context.namespace);
    let account_matches = artifact.account().is_none_or(|account| account == context.account);

    namespace_matches && account_matches
}
