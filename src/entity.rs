// Copyright 2026 Ampere Supply Engineering.

//! Entity identity with phantom-typed ids

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A typed entity ID using phantom types for type safety
///
/// These IDs are globally unique and persistent. The phantom type
/// parameter ensures that IDs for different entity types cannot be
/// mixed up at compile time: an `EntityId<ProductMarker>` will never
/// be accepted where an `EntityId<OrderMarker>` is expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EntityId<T> {
    id: Uuid,
    #[serde(skip)]
    #[schemars(skip)]
    _phantom: PhantomData<T>,
}

impl<T> EntityId<T> {
    /// Create a new random entity ID
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            _phantom: PhantomData,
        }
    }

    /// Create an entity ID from a UUID
    pub fn from_uuid(id: Uuid) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    /// Parse an entity ID from its string form
    pub fn parse(s: &str) -> Option<Self> {
        Uuid::parse_str(s).ok().map(Self::from_uuid)
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.id
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl<T> Default for EntityId<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<EntityId<T>> for Uuid {
    fn from(id: EntityId<T>) -> Self {
        id.id
    }
}

impl<T> From<&EntityId<T>> for Uuid {
    fn from(id: &EntityId<T>) -> Self {
        id.id
    }
}

/// Marker for Product entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ProductMarker;

/// Marker for Category entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct CategoryMarker;

/// Marker for Order entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct OrderMarker;

/// Marker for User entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct UserMarker;

/// Marker for Video entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct VideoMarker;

/// Product entity id
pub type ProductId = EntityId<ProductMarker>;
/// Category entity id
pub type CategoryId = EntityId<CategoryMarker>;
/// Order entity id
pub type OrderId = EntityId<OrderMarker>;
/// User entity id
pub type UserId = EntityId<UserMarker>;
/// Video entity id
pub type VideoId = EntityId<VideoMarker>;

/// Marker trait for aggregate roots
///
/// Aggregate roots are the entry points for modifying aggregates. The
/// version field supports optimistic concurrency at the store layer.
pub trait AggregateRoot: Sized {
    /// The type of ID for this aggregate
    type Id: Copy + Eq + Send + Sync;

    /// Get the aggregate's ID
    fn id(&self) -> Self::Id;

    /// Get the aggregate's version for optimistic concurrency
    fn version(&self) -> u64;

    /// Increment the version
    fn increment_version(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test id creation and uniqueness
    #[test]
    fn test_entity_id_new() {
        let id1 = ProductId::new();
        let id2 = ProductId::new();

        assert_ne!(id1, id2);
        assert!(!id1.as_uuid().is_nil());
        assert!(!id2.as_uuid().is_nil());
    }

    /// Test id round-trip through its string form
    #[test]
    fn test_entity_id_parse() {
        let id = OrderId::new();
        let parsed = OrderId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);

        assert!(OrderId::parse("not-a-uuid").is_none());
    }

    /// Test serde round-trip is transparent (plain uuid string)
    #[test]
    fn test_entity_id_serde() {
        let original = CategoryId::new();
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, format!("\"{original}\""));

        let deserialized: CategoryId = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    /// Test ids as hash map keys
    #[test]
    fn test_ids_as_keys() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        let id1 = UserId::new();
        let id2 = UserId::new();
        map.insert(id1, "alice");
        map.insert(id2, "bob");
        assert_eq!(map.get(&id1), Some(&"alice"));
        assert_eq!(map.get(&id2), Some(&"bob"));
    }

    /// Test id equality for the same underlying uuid
    #[test]
    fn test_id_equality() {
        let uuid = Uuid::new_v4();
        let a = VideoId::from_uuid(uuid);
        let b = VideoId::from_uuid(uuid);
        assert_eq!(a, b);
        assert_eq!(Uuid::from(a), uuid);
    }
}
