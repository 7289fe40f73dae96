//! Identifiers for drivers, constructors and races.
//!
//! The results feed identifies everything by an opaque string key
//! (`"max_verstappen"`, `"red_bull"`, `"2024_5"`), so a single newtype
//! covers all of them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque entity key as delivered by the results feed.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new EntityId.
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Type alias for driver IDs
pub type DriverId = EntityId;

/// Type alias for constructor (team) IDs
pub type ConstructorId = EntityId;

/// Type alias for race IDs
pub type RaceId = EntityId;

/// A driver or constructor, depending on aggregation mode.
pub type CompetitorId = EntityId;
