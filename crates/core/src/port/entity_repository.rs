// Entity Repository Port (plain, non-transactional CRUD)

use crate::domain::{Entity, EntityId, EntityKind};
use crate::error::StoreResult;
use async_trait::async_trait;

/// Single-statement persistence operations for one entity kind
#[async_trait]
pub trait EntityRepository<K: EntityKind>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Entity<K>>>;

    /// All entities, ordered by ID
    async fn find_all(&self) -> StoreResult<Vec<Entity<K>>>;

    /// Entities whose ID is in `ids`, ordered by ID (unknown IDs are skipped)
    async fn find_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Entity<K>>>;

    /// Delete by ID, returning the number of rows removed
    async fn delete_by_id(&self, id: EntityId) -> StoreResult<u64>;

    /// Delete every entity whose ID is in `ids`, returning the number removed
    async fn delete_by_ids(&self, ids: &[EntityId]) -> StoreResult<u64>;
}
