// SQLite EntityRepository Implementation

use crate::SqliteEntityTransaction;
use async_trait::async_trait;
use roster_core::domain::{Entity, EntityId, EntityKind};
use roster_core::error::{StoreError, StoreResult};
use roster_core::port::{EntityRepository, EntityTransaction, TransactionalEntityStore};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::marker::PhantomData;

const BEGIN_IMMEDIATE: &str = "BEGIN IMMEDIATE";

// Helper to convert sqlx::Error to StoreError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                // SQLITE_CONSTRAINT_UNIQUE / SQLITE_CONSTRAINT_PRIMARYKEY
                Some(code @ ("2067" | "1555")) => {
                    StoreError::UniqueViolation(format!("{} ({})", db_err.message(), code))
                }
                // SQLITE_BUSY - database is locked
                Some("5") => StoreError::Query(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                Some(code) => {
                    StoreError::Query(format!("Database error [{}]: {}", code, db_err.message()))
                }
                None => StoreError::Query(format!("Database error: {}", db_err.message())),
            }
        }
        sqlx::Error::RowNotFound => StoreError::Query("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => StoreError::Query(format!("Column not found: {}", col)),
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Connection(err.to_string())
        }
        _ => StoreError::Query(err.to_string()),
    }
}

/// Employees and roles, one table per kind
pub struct SqliteEntityRepository<K: EntityKind> {
    pool: SqlitePool,
    kind: PhantomData<K>,
}

impl<K: EntityKind> SqliteEntityRepository<K> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            kind: PhantomData,
        }
    }

    fn select_sql() -> String {
        format!(
            "SELECT id, name, created_at, updated_at FROM {}",
            K::TABLE
        )
    }
}

#[async_trait]
impl<K: EntityKind> EntityRepository<K> for SqliteEntityRepository<K> {
    async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Entity<K>>> {
        let sql = format!("{} WHERE id = ?", Self::select_sql());
        let row = sqlx::query_as::<_, EntityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(EntityRow::into_entity))
    }

    async fn find_all(&self) -> StoreResult<Vec<Entity<K>>> {
        let sql = format!("{} ORDER BY id ASC", Self::select_sql());
        let rows: Vec<EntityRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EntityRow::into_entity).collect())
    }

    async fn find_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Entity<K>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!("{} WHERE id IN (", Self::select_sql()));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id ASC");

        let rows: Vec<EntityRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(EntityRow::into_entity).collect())
    }

    async fn delete_by_id(&self, id: EntityId) -> StoreResult<u64> {
        let sql = format!("DELETE FROM {} WHERE id = ?", K::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }

    async fn delete_by_ids(&self, ids: &[EntityId]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!("DELETE FROM {} WHERE id IN (", K::TABLE));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl<K: EntityKind> TransactionalEntityStore<K> for SqliteEntityRepository<K> {
    /// Takes the write lock up front. A deferred transaction that reads and
    /// then writes fails with SQLITE_BUSY under WAL instead of waiting, so
    /// concurrent creators would fail even for unrelated names.
    async fn begin_transaction(&self) -> StoreResult<Box<dyn EntityTransaction<K>>> {
        let tx = self
            .pool
            .begin_with(BEGIN_IMMEDIATE)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteEntityTransaction::<K>::new(tx)))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct EntityRow {
    id: i64,
    name: String,
    created_at: i64,
    updated_at: i64,
}

impl EntityRow {
    fn into_entity<K: EntityKind>(self) -> Entity<K> {
        Entity::from_parts(self.id, self.name, self.created_at, self.updated_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use roster_core::domain::{Employee, Role};

    async fn setup_test_db() -> SqlitePool {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn insert_committed<K: EntityKind>(repo: &SqliteEntityRepository<K>, name: &str) -> EntityId {
        let mut tx = repo.begin_transaction().await.unwrap();
        let mut entity = Entity::<K>::new(name, 1_000);
        tx.insert(&mut entity).await.unwrap();
        tx.commit().await.unwrap();
        entity.id.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = SqliteEntityRepository::<Employee>::new(setup_test_db().await);

        let id = insert_committed(&repo, "Ada").await;

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.id, Some(id));
        assert_eq!(found.name, "Ada");
        assert_eq!(found.created_at, 1_000);
        assert_eq!(found.updated_at, 1_000);
        assert!(repo.find_by_id(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_kinds_use_separate_tables() {
        let pool = setup_test_db().await;
        let employees = SqliteEntityRepository::<Employee>::new(pool.clone());
        let roles = SqliteEntityRepository::<Role>::new(pool);

        insert_committed(&employees, "Shared").await;
        insert_committed(&roles, "Shared").await;

        assert_eq!(employees.find_all().await.unwrap().len(), 1);
        assert_eq!(roles.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_ids_and_delete_by_ids() {
        let repo = SqliteEntityRepository::<Role>::new(setup_test_db().await);
        let a = insert_committed(&repo, "Admin").await;
        let b = insert_committed(&repo, "Billing").await;
        let c = insert_committed(&repo, "Crew").await;

        let found = repo.find_by_ids(&[c, a, 404]).await.unwrap();
        let ids: Vec<Option<i64>> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![Some(a), Some(c)]);

        assert_eq!(repo.delete_by_ids(&[a, c, 404]).await.unwrap(), 2);
        let rest = repo.find_all().await.unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, Some(b));
    }

    #[tokio::test]
    async fn test_delete_by_id_reports_rows() {
        let repo = SqliteEntityRepository::<Role>::new(setup_test_db().await);
        let id = insert_committed(&repo, "Temp").await;

        assert_eq!(repo.delete_by_id(id).await.unwrap(), 1);
        assert_eq!(repo.delete_by_id(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_insert_maps_to_unique_violation() {
        let repo = SqliteEntityRepository::<Employee>::new(setup_test_db().await);
        insert_committed(&repo, "Ada").await;

        let mut tx = repo.begin_transaction().await.unwrap();
        let mut dup = Entity::<Employee>::new("Ada", 2_000);
        let err = tx.insert(&mut dup).await.unwrap_err();

        assert!(matches!(err, StoreError::UniqueViolation(_)), "{err:?}");
        assert!(dup.id.is_none());
        tx.rollback().await.unwrap();
    }
}
