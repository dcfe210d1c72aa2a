// SQLite Transaction Implementation

use crate::entity_repository::map_sqlx_error;
use async_trait::async_trait;
use roster_core::domain::{Entity, EntityKind};
use roster_core::error::{StoreError, StoreResult};
use roster_core::port::{EntityTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use std::marker::PhantomData;

/// Wraps a sqlx transaction; dropping it unterminated rolls back.
///
/// A failed commit leaves the sqlx transaction marked open, so the driver
/// queues a rollback when it is dropped. That is connection cleanup inside
/// sqlx, not a second rollback issued by the create workflow.
pub struct SqliteEntityTransaction<K: EntityKind> {
    tx: SqlxTransaction<'static, Sqlite>,
    kind: PhantomData<K>,
}

impl<K: EntityKind> SqliteEntityTransaction<K> {
    pub fn new(tx: SqlxTransaction<'static, Sqlite>) -> Self {
        Self {
            tx,
            kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: EntityKind> Transaction for SqliteEntityTransaction<K> {
    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| StoreError::Commit(e.to_string()))
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| StoreError::Rollback(e.to_string()))
    }
}

#[async_trait]
impl<K: EntityKind> EntityTransaction<K> for SqliteEntityTransaction<K> {
    async fn exists_by_name(&mut self, name: &str) -> StoreResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE name = ?)", K::TABLE);
        let found: i64 = sqlx::query_scalar(&sql)
            .bind(name)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(found != 0)
    }

    async fn insert(&mut self, entity: &mut Entity<K>) -> StoreResult<()> {
        let sql = format!(
            "INSERT INTO {} (name, created_at, updated_at) VALUES (?, ?, ?) RETURNING id",
            K::TABLE
        );
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(&entity.name)
            .bind(entity.created_at)
            .bind(entity.updated_at)
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        entity.id = Some(id);
        Ok(())
    }
}
