//! Declarative path patterns over the manifest tree.
//!
//! A pattern such as `spec.template.spec.containers[*].image` is a chain of
//! mapping keys where `[*]` fans out over every element of a sequence.
//! Expanding a pattern against a manifest yields one [`Location`] per leaf that
//! exists; missing fields and shape mismatches simply produce fewer locations.

use serde_json::Value;
use std::fmt;

/// A concrete position inside one manifest, stored as an RFC 6901 JSON pointer.
///
/// Locations are only meaningful for the manifest they were produced from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location(String);

impl Location {
    pub(crate) fn from_pointer(pointer: impl Into<String>) -> Self {
        Self(pointer.into())
    }

    /// The JSON pointer for this location.
    #[must_use]
    pub fn pointer(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Each,
}

/// A parsed path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Parse a dotted pattern. `key[*]` iterates the sequence at `key`.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        let mut segments = Vec::new();
        for token in pattern.split('.').filter(|t| !t.is_empty()) {
            let mut key = token;
            let mut fan_out = 0;
            while let Some(stripped) = key.strip_suffix("[*]") {
                key = stripped;
                fan_out += 1;
            }
            if !key.is_empty() {
                segments.push(Segment::Key(key.to_string()));
            }
            segments.extend(std::iter::repeat_n(Segment::Each, fan_out));
        }

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    /// The pattern text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Every location in `root` matched by this pattern, in document order.
    ///
    /// `null` leaves are treated as absent.
    #[must_use]
    pub fn locate(&self, root: &Value) -> Vec<Location> {
        let mut found = Vec::new();
        let mut pointer = String::new();
        walk(root, &self.segments, &mut pointer, &mut found);
        found
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn walk(node: &Value, segments: &[Segment], pointer: &mut String, found: &mut Vec<Location>) {
    let Some((segment, rest)) = segments.split_first() else {
        if !node.is_null() {
            found.push(Location(pointer.clone()));
        }
        return;
    };

    let restore = pointer.len();
    match (segment, node) {
        (Segment::Key(key), Value::Object(map)) => {
            if let Some(child) = map.get(key) {
                pointer.push('/');
                push_escaped(pointer, key);
                walk(child, rest, pointer, found);
            }
        }
        (Segment::Each, Value::Array(items)) => {
            for (index, child) in items.iter().enumerate() {
                pointer.push('/');
                pointer.push_str(&index.to_string());
                walk(child, rest, pointer, found);
                pointer.truncate(restore);
            }
        }
        _ => {}
    }
    pointer.truncate(restore);
}

fn push_escaped(pointer: &mut String, key: &str) {
    for ch in key.chars() {
        match ch {
            '~' => pointer.push_str("~0"),
            '/' => pointer.push_str("~1"),
            _ => pointer.push(ch),
        }
    }
}
