//! Create-if-absent workflow against a real SQLite database

use std::sync::Arc;

use roster_core::application::{CreateEntityRequest, EntityService, IdRequest, IdsRequest};
use roster_core::domain::{Employee, EntityKind, Role};
use roster_core::error::ErrorKind;
use roster_core::port::time_provider::SystemTimeProvider;
use roster_core::port::{EntityRepository, RuleValidator};
use roster_infra_sqlite::{create_pool, run_migrations, SqliteEntityRepository, SqlitePool};
use tokio_test::{assert_err, assert_ok};

async fn memory_pool() -> SqlitePool {
    let pool = create_pool("sqlite::memory:").await.unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}

fn service<K: EntityKind>(
    pool: &SqlitePool,
) -> (Arc<SqliteEntityRepository<K>>, EntityService<K>) {
    let repo = Arc::new(SqliteEntityRepository::<K>::new(pool.clone()));
    let service = EntityService::new(
        repo.clone(),
        repo.clone(),
        Arc::new(RuleValidator),
        Arc::new(SystemTimeProvider),
    );
    (repo, service)
}

#[tokio::test]
async fn test_create_then_find_for_various_name_lengths() {
    let pool = memory_pool().await;
    let (_repo, service) = service::<Employee>(&pool);

    for len in [2usize, 3, 50, 99, 100] {
        let name = "n".repeat(len);
        let created = assert_ok!(service.create(CreateEntityRequest::new(name.clone())).await);
        assert!(created.id > 0);

        let found = assert_ok!(service.find_by_id(IdRequest { id: created.id }).await);
        assert_eq!(found.name, name);
        assert_eq!(found.id, created.id);
    }
}

#[tokio::test]
async fn test_duplicate_create_leaves_single_row() {
    let pool = memory_pool().await;
    let (repo, service) = service::<Role>(&pool);

    assert_ok!(service.create(CreateEntityRequest::new("Admin")).await);
    let err = assert_err!(service.create(CreateEntityRequest::new("Admin")).await);
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    // Trimming happens before the uniqueness check.
    let err = assert_err!(service.create(CreateEntityRequest::new("  Admin ")).await);
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    assert_eq!(repo.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_names_write_nothing() {
    let pool = memory_pool().await;
    let (repo, service) = service::<Employee>(&pool);

    for name in ["", "   ", "x", "y".repeat(101).as_str()] {
        let err = assert_err!(service.create(CreateEntityRequest::new(name)).await);
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    assert!(repo.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_names_are_stored_literally() {
    let pool = memory_pool().await;
    let (_repo, service) = service::<Employee>(&pool);

    let name = "Robert'); DROP TABLE employees;--";
    let created = assert_ok!(service.create(CreateEntityRequest::new(name)).await);

    let found = assert_ok!(service.find_by_id(IdRequest { id: created.id }).await);
    assert_eq!(found.name, name);
    assert_eq!(assert_ok!(service.find_all().await).len(), 1);
}

#[tokio::test]
async fn test_employees_and_roles_do_not_collide() {
    let pool = memory_pool().await;
    let (_, employees) = service::<Employee>(&pool);
    let (_, roles) = service::<Role>(&pool);

    assert_ok!(employees.create(CreateEntityRequest::new("Morgan")).await);
    assert_ok!(roles.create(CreateEntityRequest::new("Morgan")).await);
}

#[tokio::test]
async fn test_batch_lookup_and_delete() {
    let pool = memory_pool().await;
    let (_repo, service) = service::<Role>(&pool);

    let mut ids = Vec::new();
    for name in ["Admin", "Billing", "Crew", "Design"] {
        ids.push(assert_ok!(service.create(CreateEntityRequest::new(name)).await).id);
    }

    let found = assert_ok!(service.find_by_ids(IdsRequest::new(vec![ids[3], ids[1], 9_999])).await);
    let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Billing", "Design"]);

    let res = assert_ok!(service.delete_by_ids(IdsRequest::new(vec![ids[0], ids[1], 9_999])).await);
    assert_eq!(res.deleted, 2);

    assert_ok!(service.delete_by_id(IdRequest { id: ids[2] }).await);
    let err = assert_err!(service.delete_by_id(IdRequest { id: ids[2] }).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let rest = assert_ok!(service.find_all().await);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].name, "Design");
}

#[tokio::test]
async fn test_rows_survive_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("roster.db");
    let db_path = db_path.to_str().unwrap();

    let id = {
        let pool = create_pool(db_path).await.unwrap();
        run_migrations(&pool).await.unwrap();
        let (_repo, service) = service::<Employee>(&pool);
        let created = assert_ok!(service.create(CreateEntityRequest::new("Grace Hopper")).await);
        pool.close().await;
        created.id
    };

    let pool = create_pool(db_path).await.unwrap();
    run_migrations(&pool).await.unwrap();
    let (_repo, service) = service::<Employee>(&pool);

    let found = assert_ok!(service.find_by_id(IdRequest { id }).await);
    assert_eq!(found.name, "Grace Hopper");
    let err = assert_err!(service.create(CreateEntityRequest::new("Grace Hopper")).await);
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}
