//! Entity identifiers.

use std::fmt;

/// Identifier of an entity in the local system's identity space.
///
/// Local ids are opaque: the engine only compares, hashes and displays
/// them. Integer ids from a local database convert losslessly.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalId(String);

impl LocalId {
    /// Creates a local id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalId({})", self.0)
    }
}

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<u64> for LocalId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<u32> for LocalId {
    fn from(id: u32) -> Self {
        Self(id.to_string())
    }
}

impl From<i64> for LocalId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for LocalId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for LocalId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for LocalId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identity of an entity: its concrete type plus its local id.
///
/// This is the equality used for graph deduplication. Two values with
/// the same key are interchangeable even if their other fields differ.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityKey {
    /// Name of the concrete entity type.
    pub entity_type: &'static str,
    /// Local identifier.
    pub local_id: LocalId,
}

impl EntityKey {
    /// Creates a new key.
    pub fn new(entity_type: &'static str, local_id: impl Into<LocalId>) -> Self {
        Self {
            entity_type,
            local_id: local_id.into(),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.entity_type, self.local_id)
    }
}
