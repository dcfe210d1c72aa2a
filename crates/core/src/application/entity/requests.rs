// Request DTOs and their validation rules

use crate::domain::{EntityId, Field, Rule, Validate};
use serde::{Deserialize, Serialize};

/// Bounds on the trimmed length of an entity name
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 100;

/// Create request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEntityRequest {
    pub name: String,
}

impl CreateEntityRequest {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Validate for CreateEntityRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::text("name", &self.name)
            .rule(Rule::Required)
            .rule(Rule::MinLength(NAME_MIN_LEN))
            .rule(Rule::MaxLength(NAME_MAX_LEN))]
    }
}

/// Single-ID request (get, delete)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IdRequest {
    pub id: EntityId,
}

impl Validate for IdRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::integer("id", self.id).rule(Rule::GreaterThan(0))]
    }
}

/// Batch request (get many, delete many)
///
/// `ids` stays optional so an absent list and an empty list are reported
/// as different violations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdsRequest {
    #[serde(default)]
    pub ids: Option<Vec<EntityId>>,
}

impl IdsRequest {
    pub fn new(ids: Vec<EntityId>) -> Self {
        Self { ids: Some(ids) }
    }
}

impl Validate for IdsRequest {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![Field::integers("ids", self.ids.as_deref())
            .rule(Rule::Required)
            .rule(Rule::MinLength(1))
            .each(Rule::GreaterThan(0))]
    }
}
