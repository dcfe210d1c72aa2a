// Entity Service - use cases shared by employees and roles

pub mod create;
pub mod requests;


pub use requests::{CreateEntityRequest, IdRequest, IdsRequest};

use crate::domain::{Entity, EntityKind, EntityResponse};
use crate::error::{AppError, Result};
use crate::port::{EntityRepository, TimeProvider, TransactionalEntityStore, Validator};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Outcome of a batch delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub deleted: u64,
}

/// Entity Service for one entity kind
pub struct EntityService<K: EntityKind> {
    store: Arc<dyn TransactionalEntityStore<K>>,
    repo: Arc<dyn EntityRepository<K>>,
    validator: Arc<dyn Validator>,
    time_provider: Arc<dyn TimeProvider>,
}

impl<K: EntityKind> EntityService<K> {
    pub fn new(
        store: Arc<dyn TransactionalEntityStore<K>>,
        repo: Arc<dyn EntityRepository<K>>,
        validator: Arc<dyn Validator>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            repo,
            validator,
            time_provider,
        }
    }

    /// Create a new entity unless the name is taken
    pub async fn create(&self, req: CreateEntityRequest) -> Result<EntityResponse> {
        create::execute(
            self.store.as_ref(),
            self.validator.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Find entity by ID
    pub async fn find_by_id(&self, req: IdRequest) -> Result<EntityResponse> {
        self.validator.validate(&req)?;

        let entity = self
            .repo
            .find_by_id(req.id)
            .await
            .map_err(AppError::Repository)?
            .ok_or(AppError::NotFound {
                entity: K::NAME,
                id: req.id,
            })?;

        EntityResponse::try_from(&entity)
    }

    /// All entities, ordered by ID
    pub async fn find_all(&self) -> Result<Vec<EntityResponse>> {
        let entities = self.repo.find_all().await.map_err(AppError::Repository)?;
        to_responses(&entities)
    }

    /// Entities for the given IDs; unknown IDs are skipped
    pub async fn find_by_ids(&self, req: IdsRequest) -> Result<Vec<EntityResponse>> {
        self.validator.validate(&req)?;
        let ids = req.ids.unwrap_or_default();

        let entities = self
            .repo
            .find_by_ids(&ids)
            .await
            .map_err(AppError::Repository)?;
        to_responses(&entities)
    }

    /// Delete by ID; a missing entity is an error
    pub async fn delete_by_id(&self, req: IdRequest) -> Result<()> {
        self.validator.validate(&req)?;

        let deleted = self
            .repo
            .delete_by_id(req.id)
            .await
            .map_err(AppError::Repository)?;

        if deleted == 0 {
            return Err(AppError::NotFound {
                entity: K::NAME,
                id: req.id,
            });
        }

        info!(entity = K::NAME, id = req.id, "Entity deleted");
        Ok(())
    }

    /// Delete every entity in the batch, reporting how many existed
    pub async fn delete_by_ids(&self, req: IdsRequest) -> Result<DeleteResponse> {
        self.validator.validate(&req)?;
        let ids = req.ids.unwrap_or_default();

        let deleted = self
            .repo
            .delete_by_ids(&ids)
            .await
            .map_err(AppError::Repository)?;

        info!(entity = K::NAME, requested = ids.len(), deleted, "Entities deleted");
        Ok(DeleteResponse { deleted })
    }
}

fn to_responses<K: EntityKind>(entities: &[Entity<K>]) -> Result<Vec<EntityResponse>> {
    entities.iter().map(EntityResponse::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, Rule};
    use crate::error::{ErrorKind, StoreError};
    use crate::port::time_provider::FixedTimeProvider;
    use crate::port::transaction::mocks::{Faults, InMemoryEntityStore};
    use crate::port::RuleValidator;

    fn service(store: Arc<InMemoryEntityStore<Role>>) -> EntityService<Role> {
        EntityService::new(
            store.clone(),
            store,
            Arc::new(RuleValidator),
            Arc::new(FixedTimeProvider(1_700_000_000_000)),
        )
    }

    #[tokio::test]
    async fn test_find_by_id_round_trips_created_entity() {
        let store = Arc::new(InMemoryEntityStore::<Role>::new());
        let service = service(store);

        let created = service.create(CreateEntityRequest::new("Auditor")).await.unwrap();
        let found = service.find_by_id(IdRequest { id: created.id }).await.unwrap();

        assert_eq!(found, created);
        assert!(found.id > 0);
    }

    #[tokio::test]
    async fn test_find_by_id_missing_is_not_found() {
        let service = service(Arc::new(InMemoryEntityStore::new()));

        let err = service.find_by_id(IdRequest { id: 42 }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "role 42 not found");
    }

    #[tokio::test]
    async fn test_find_by_id_rejects_non_positive_id() {
        let service = service(Arc::new(InMemoryEntityStore::new()));

        let err = service.find_by_id(IdRequest { id: 0 }).await.unwrap_err();
        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.violations()[0].rule, Rule::GreaterThan(0))
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_all_and_find_by_ids_are_ordered() {
        let store = Arc::new(InMemoryEntityStore::<Role>::new());
        let a = store.seed("Admin", 1);
        let b = store.seed("Billing", 1);
        let c = store.seed("Crew", 1);
        let service = service(store);

        let all = service.find_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Admin", "Billing", "Crew"]);

        let some = service
            .find_by_ids(IdsRequest::new(vec![c, a, 999]))
            .await
            .unwrap();
        let ids: Vec<i64> = some.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![a, c]);
        assert!(!ids.contains(&b));
    }

    #[tokio::test]
    async fn test_find_by_ids_rejects_absent_and_empty_lists_differently() {
        let service = service(Arc::new(InMemoryEntityStore::new()));

        let absent = service.find_by_ids(IdsRequest { ids: None }).await.unwrap_err();
        let empty = service.find_by_ids(IdsRequest::new(vec![])).await.unwrap_err();

        let rule = |err: AppError| match err {
            AppError::Validation(errors) => errors.violations()[0].rule,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert_eq!(rule(absent), Rule::Required);
        assert_eq!(rule(empty), Rule::MinLength(1));
    }

    #[tokio::test]
    async fn test_delete_by_id() {
        let store = Arc::new(InMemoryEntityStore::<Role>::new());
        let id = store.seed("Temp", 1);
        let service = service(store.clone());

        service.delete_by_id(IdRequest { id }).await.unwrap();
        assert!(store.names().is_empty());

        let err = service.delete_by_id(IdRequest { id }).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_by_ids_counts_existing_rows() {
        let store = Arc::new(InMemoryEntityStore::<Role>::new());
        let a = store.seed("One", 1);
        let b = store.seed("Two", 1);
        store.seed("Three", 1);
        let service = service(store.clone());

        let res = service
            .delete_by_ids(IdsRequest::new(vec![a, b, 77]))
            .await
            .unwrap();
        assert_eq!(res, DeleteResponse { deleted: 2 });
        assert_eq!(store.names(), vec!["Three".to_string()]);
    }

    #[tokio::test]
    async fn test_plain_query_failure_is_repository_error() {
        let store = Arc::new(InMemoryEntityStore::<Role>::new().with_faults(Faults {
            query: Some(StoreError::Connection("pool closed".to_string())),
            ..Faults::default()
        }));
        let service = service(store);

        let err = service.find_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Repository);
        assert!(err.to_string().contains("pool closed"));
    }
}
