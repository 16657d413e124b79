//! Docker image reference parsing.
//!
//! Image references follow `[registry[:port]/]repository[:tag][@digest]`.
//! Colons are ambiguous: they separate a registry port, a tag, and the
//! algorithm inside a digest. The rules used here:
//!
//! - When a digest is present, everything before `@` is the artifact name and
//!   no tag stripping happens (`reg.repo:123@sha256:13` names `reg.repo:123`).
//! - Otherwise a `:tag` is only recognised after the last `/`, so a registry
//!   port is never mistaken for a tag (`reg:5000/r/j` has no tag).
//!
//! References that do not fit the grammar at all are reported as `None` and
//! produce no binding candidate.

use regex::Regex;
use std::sync::LazyLock;

static IMAGE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    let label = r"[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?";
    let component = r"[a-z0-9]+(?:(?:[._]|__|-+)[a-z0-9]+)*";
    let pattern = format!(
        r"^(?P<name>(?:{label}(?:\.{label})*(?::[0-9]+)?/)?{component}(?:/{component})*)(?::(?P<tag>[\w][\w.-]{{0,127}}))?(?:@(?P<digest>[A-Za-z][A-Za-z0-9]*(?:[-_+.][A-Za-z][A-Za-z0-9]*)*:[0-9A-Za-z]+))?$"
    );
    Regex::new(&pattern).expect("image reference pattern is valid")
});

/// A parsed docker image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference<'a> {
    reference: &'a str,
    repository: &'a str,
    tag: Option<&'a str>,
    digest: Option<&'a str>,
}

impl<'a> ImageReference<'a> {
    /// Parse a reference, returning `None` if it is malformed.
    #[must_use]
    pub fn parse(reference: &'a str) -> Option<Self> {
        let captures = IMAGE_REFERENCE.captures(reference)?;
        Some(Self {
            reference,
            repository: captures.name("name")?.as_str(),
            tag: captures.name("tag").map(|m| m.as_str()),
            digest: captures.name("digest").map(|m| m.as_str()),
        })
    }

    /// The literal reference text.
    #[must_use]
    pub const fn reference(&self) -> &'a str {
        self.reference
    }

    /// Registry and repository, without tag or digest.
    #[must_use]
    pub const fn repository(&self) -> &'a str {
        self.repository
    }

    /// The tag, if any.
    #[must_use]
    pub const fn tag(&self) -> Option<&'a str> {
        self.tag
    }

    /// The digest (`algorithm:hex`), if any.
    #[must_use]
    pub const fn digest(&self) -> Option<&'a str> {
        self.digest
    }

    /// The name an image artifact is matched by.
    ///
    /// A digest always wins over tag stripping: with a digest the name is the
    /// text before `@`, otherwise it is the repository without its tag.
    #[must_use]
    pub fn artifact_name(&self) -> &'a str {
        match self.reference.split_once('@') {
            Some((name, _)) if self.digest.is_some() => name,
            _ => self.repository,
        }
    }

    /// Whether the reference pins an explicit tag.
    ///
    /// Digest references are not considered tag pins.
    #[must_use]
    pub const fn has_explicit_tag(&self) -> bool {
        self.tag.is_some() && self.digest.is_none()
    }
}

/// Shorthand for [`ImageReference::artifact_name`] on a raw reference.
#[must_use]
pub fn name_from_reference(reference: &str) -> Option<&str> {
    ImageReference::parse(reference).map(|image| image.artifact_name())
}
