//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for remote identifiers. Each newtype ensures
//! data validity at construction time.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::DomainError;

// ============================================================================
// GroupPrefix
// ============================================================================

/// Identifier of a top-level remote group
///
/// A group is a logical folder in the bucket, identified by its common key
/// prefix including the trailing separator (e.g. `"showA/"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupPrefix(String);

impl GroupPrefix {
    /// Creates a validated group prefix
    ///
    /// The prefix must be non-empty and carry its trailing `/` separator,
    /// matching what a delimiter listing returns as a common prefix.
    pub fn new(prefix: impl Into<String>) -> Result<Self, DomainError> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix == "/" {
            return Err(DomainError::InvalidPrefix(prefix));
        }
        if !prefix.ends_with('/') {
            return Err(DomainError::InvalidPrefix(prefix));
        }
        Ok(Self(prefix))
    }

    /// The raw prefix string, trailing separator included
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The trailing path segment of the prefix, used as the default local
    /// folder name (`"deliveries/showA/"` -> `"showA"`)
    #[must_use]
    pub fn display_name(&self) -> &str {
        let trimmed = self.0.trim_end_matches('/');
        trimmed.rsplit('/').next().unwrap_or(trimmed)
    }

    /// The key path relative to this prefix
    ///
    /// Keys that do not start with the prefix are returned unchanged,
    /// mirroring how the store may hand back keys outside the requested
    /// prefix in edge cases.
    #[must_use]
    pub fn relative_of<'a>(&self, key: &'a ObjectKey) -> &'a str {
        key.as_str().strip_prefix(self.0.as_str()).unwrap_or(key.as_str())
    }
}

impl Display for GroupPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for GroupPrefix {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

// ============================================================================
// ObjectKey
// ============================================================================

/// Full key of a single remote object under a group
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Creates a validated object key (must be non-empty)
    pub fn new(key: impl Into<String>) -> Result<Self, DomainError> {
        let key = key.into();
        if key.is_empty() {
            return Err(DomainError::InvalidKey(key));
        }
        Ok(Self(key))
    }

    /// The raw key string
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this key is a directory marker (trailing separator)
    #[must_use]
    pub fn is_directory_marker(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Whether the key ends with the given extension (case-sensitive,
    /// extension given with its leading dot)
    #[must_use]
    pub fn has_extension(&self, extension: &str) -> bool {
        self.0.ends_with(extension)
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ObjectKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}
