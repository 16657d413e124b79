//! artibind - bind version-pinned artifacts into Kubernetes manifests
//!
//! Deploy pipelines produce artifacts (container images, versioned config maps
//! and secrets) and then deploy manifests that refer to them by name. artibind
//! finds those references and rewrites them to the exact artifacts produced,
//! so a deploy always uses what the pipeline built.
//!
//! # Architecture Overview
//!
//! - A [`manifest::KubernetesManifest`] is one parsed Kubernetes object.
//! - An [`artifact::Artifact`] is a typed, named, addressable thing a manifest
//!   may reference.
//! - A [`replacer::Replacer`] knows where one kind of reference lives and how
//!   to read and rewrite it.
//! - [`replacer::ArtifactReplacer`] runs a list of replacers over a manifest to
//!   either discover references (`find_all`) or bind a pool of artifacts into
//!   a copy of the manifest (`replace_all`).
//!
//! The binding core is synchronous and never modifies its input. The CLI is a
//! thin async layer doing file I/O around it.
//!
//! # Core Modules
//!
//! - [`artifact`] - Artifact model, image reference parsing, pool loading
//! - [`manifest`] - Manifest documents, path lookup, YAML/JSON I/O
//! - [`replacer`] - Replacement strategies, binding policy, orchestration
//! - [`config`] - User configuration (`~/.artibind/config.toml`)
//! - [`cli`] - `find` and `replace` commands
//! - [`core`] - Error types and user-facing error formatting
//! - [`constants`] - Shared names and environment variables
//!
//! # Example
//!
//! ```rust
//! use artibind::manifest::KubernetesManifest;
//! use artibind::replacer::ArtifactReplacer;
//!
//! let manifest = KubernetesManifest::parse(r"
//! kind: Pod
//! metadata: { name: debug }
//! spec:
//!   containers:
//!     - name: shell
//!       image: busybox:1.36
//! ").unwrap();
//!
//! let found = ArtifactReplacer::kubernetes_default().find_all(&manifest);
//! assert_eq!(found.iter().next().map(|a| a.name()), Some("busybox"));
//! ```

pub mod artifact;
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod manifest;
pub mod replacer;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
