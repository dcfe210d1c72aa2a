// Domain Layer - Pure business logic and entities

pub mod entity;
pub mod validation;

// Re-exports
pub use entity::{Employee, Entity, EntityId, EntityKind, EntityResponse, Role};
pub use validation::{validate_fields, Field, FieldValue, Rule, Validate, ValidationErrors, Violation};
