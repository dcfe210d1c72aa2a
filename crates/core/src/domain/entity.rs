// Entity Domain Model
//
// Employees and roles share one shape; the kind is a zero-sized marker so
// the two never mix at compile time.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Store-assigned identifier
pub type EntityId = i64;

/// Marker trait for the entity kinds stored by the service
pub trait EntityKind: fmt::Debug + Send + Sync + 'static {
    /// Singular name used in messages and RPC method prefixes
    const NAME: &'static str;

    /// Backing table
    const TABLE: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Employee;

impl EntityKind for Employee {
    const NAME: &'static str = "employee";
    const TABLE: &'static str = "employees";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Role;

impl EntityKind for Role {
    const NAME: &'static str = "role";
    const TABLE: &'static str = "roles";
}

/// A named entity of kind `K`.
///
/// `id` stays `None` until the store has persisted the row and assigned one.
pub struct Entity<K: EntityKind> {
    pub id: Option<EntityId>,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
    kind: PhantomData<K>,
}

impl<K: EntityKind> Entity<K> {
    /// New, not yet persisted entity stamped with `now` (ms since epoch)
    pub fn new(name: impl Into<String>, now: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            created_at: now,
            updated_at: now,
            kind: PhantomData,
        }
    }

    /// Rehydrate a persisted row
    pub fn from_parts(id: EntityId, name: String, created_at: i64, updated_at: i64) -> Self {
        Self {
            id: Some(id),
            name,
            created_at,
            updated_at,
            kind: PhantomData,
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn kind_name(&self) -> &'static str {
        K::NAME
    }
}

// Manual impls: derives would put bounds on the marker type.
impl<K: EntityKind> Clone for Entity<K> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            kind: PhantomData,
        }
    }
}

impl<K: EntityKind> fmt::Debug for Entity<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME)
            .field("id", &self.id)
            .field("name", &self.name)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl<K: EntityKind> PartialEq for Entity<K> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.created_at == other.created_at
            && self.updated_at == other.updated_at
    }
}

/// Public projection of a persisted entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityResponse {
    pub id: EntityId,
    pub name: String,
}

impl<K: EntityKind> TryFrom<&Entity<K>> for EntityResponse {
    type Error = AppError;

    fn try_from(entity: &Entity<K>) -> Result<Self, Self::Error> {
        let id = entity.id.ok_or_else(|| {
            AppError::Internal(format!("{} '{}' has no id", K::NAME, entity.name))
        })?;

        Ok(Self {
            id,
            name: entity.name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity_is_unpersisted() {
        let role = Entity::<Role>::new("admin", 1_700_000_000_000);
        assert!(!role.is_persisted());
        assert_eq!(role.created_at, role.updated_at);
        assert_eq!(role.kind_name(), "role");
    }

    #[test]
    fn test_response_requires_id() {
        let employee = Entity::<Employee>::new("Ada", 0);
        assert!(EntityResponse::try_from(&employee).is_err());

        let employee = Entity::<Employee>::from_parts(7, "Ada".to_string(), 0, 0);
        let response = EntityResponse::try_from(&employee).unwrap();
        assert_eq!(
            response,
            EntityResponse {
                id: 7,
                name: "Ada".to_string()
            }
        );
    }
}
