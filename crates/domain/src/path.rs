//! Store paths: validated, slash-separated locations in the remote tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathError;

const FORBIDDEN: [char; 5] = ['.', '#', '$', '[', ']'];

/// A location in the remote key-value tree.
///
/// The empty path is the root. Segments are never empty and never contain
/// `.`, `#`, `$`, `[` or `]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StorePath {
    segments: Vec<String>,
}

impl StorePath {
    /// The root of the tree.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a slash-separated path. A single leading or trailing slash is
    /// tolerated; `""` and `"/"` are the root.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a segment is empty or contains a
    /// forbidden character.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in trimmed.split('/') {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: raw.to_string(),
                });
            }
            if let Some(character) = segment.chars().find(|c| FORBIDDEN.contains(c)) {
                return Err(PathError::ForbiddenCharacter {
                    segment: segment.to_string(),
                    character,
                });
            }
            segments.push(segment.to_string());
        }
        Ok(Self { segments })
    }

    /// Build a path from segments known to be valid at compile time.
    fn from_static(segments: &[&'static str]) -> Self {
        Self {
            segments: segments.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// `sensors`: the latest device reading.
    #[must_use]
    pub fn sensors() -> Self {
        Self::from_static(&["sensors"])
    }

    /// `actuators`: the actuator node.
    #[must_use]
    pub fn actuators() -> Self {
        Self::from_static(&["actuators"])
    }

    /// `actuators/waterPump`: the pump leaf.
    #[must_use]
    pub fn water_pump() -> Self {
        Self::from_static(&["actuators", "waterPump"])
    }

    /// `system`: master switch and operation mode.
    #[must_use]
    pub fn system() -> Self {
        Self::from_static(&["system"])
    }

    /// `history/moisture`: the append-only moisture series.
    #[must_use]
    pub fn moisture_history() -> Self {
        Self::from_static(&["history", "moisture"])
    }

    /// Whether this is the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Append a relative path.
    #[must_use]
    pub fn join(&self, other: &StorePath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        Self { segments }
    }

    /// Append a single child key, validating it like a path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] if `key` is not a valid relative path.
    pub fn child(&self, key: &str) -> Result<Self, PathError> {
        Ok(self.join(&Self::parse(key)?))
    }

    /// Whether `self` equals `other` or lies above it.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &StorePath) -> bool {
        other.segments.starts_with(&self.segments)
    }

    /// Whether a write at one path can change the value seen at the other.
    #[must_use]
    pub fn overlaps(&self, other: &StorePath) -> bool {
        self.is_ancestor_of(other) || other.is_ancestor_of(self)
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

impl FromStr for StorePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StorePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StorePath> for String {
    fn from(path: StorePath) -> Self {
        path.to_string()
    }
}
