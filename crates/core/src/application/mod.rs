// Application Layer - Use Cases

pub mod entity;

// Re-exports
pub use entity::{CreateEntityRequest, DeleteResponse, EntityService, IdRequest, IdsRequest};
