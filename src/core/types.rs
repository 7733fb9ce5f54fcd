//! Core type definitions used throughout the codebase

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Position in world units (serialized coordinates times `SCALE_FACTOR`)
pub type Position = glam::DVec2;

/// Game tick counter (simulation time unit)
pub type Tick = u64;

/// Unique identifier for planets and fleets
///
/// Map files use arbitrary strings, generated ids are random UUIDs so an
/// opponent learns nothing from their values.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier for a player, or the neutral sentinel
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Reserved owner of unclaimed planets
    pub const NEUTRAL: &'static str = "0";

    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn neutral() -> Self {
        Self(Self::NEUTRAL.to_string())
    }

    pub fn is_neutral(&self) -> bool {
        self.0 == Self::NEUTRAL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PlayerId {
    fn default() -> Self {
        Self::neutral()
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_uniqueness() {
        let a = EntityId::new();
        let b = EntityId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_player_id_neutral() {
        assert!(PlayerId::neutral().is_neutral());
        assert!(PlayerId::default().is_neutral());
        assert!(!PlayerId::from("1").is_neutral());
        assert!(!PlayerId::new().is_neutral());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let json = serde_json::to_string(&EntityId::from("p1")).unwrap();
        assert_eq!(json, "\"p1\"");
        let owner: PlayerId = serde_json::from_str("\"0\"").unwrap();
        assert!(owner.is_neutral());
    }

    #[test]
    fn test_entity_id_ordering() {
        let mut ids = vec![EntityId::from("b"), EntityId::from("a"), EntityId::from("c")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
        assert_eq!(ids[2].as_str(), "c");
    }
}
