// Transaction ports for the create-if-absent workflow

use crate::domain::{Entity, EntityKind};
use crate::error::StoreResult;
use async_trait::async_trait;

/// An open store transaction.
///
/// Both terminal operations consume the handle, so a transaction can be
/// ended at most once and never reused afterwards. Implementations must roll
/// back when a handle is dropped without being terminated.
#[async_trait]
pub trait Transaction: Send {
    /// Commit the transaction
    async fn commit(self: Box<Self>) -> StoreResult<()>;

    /// Rollback the transaction
    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Entity operations scoped to one transaction
#[async_trait]
pub trait EntityTransaction<K: EntityKind>: Transaction {
    /// Whether an entity with this exact name exists, including rows written
    /// earlier in this same transaction
    async fn exists_by_name(&mut self, name: &str) -> StoreResult<bool>;

    /// Insert the entity and set its store-assigned ID.
    ///
    /// On failure the entity's ID is left untouched.
    async fn insert(&mut self, entity: &mut Entity<K>) -> StoreResult<()>;
}

/// Opens transactions for one entity kind
#[async_trait]
pub trait TransactionalEntityStore<K: EntityKind>: Send + Sync {
    /// Begin a new transaction
    async fn begin_transaction(&self) -> StoreResult<Box<dyn EntityTransaction<K>>>;
}

// ============================================================================
// In-memory implementation for testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::domain::EntityId;
    use crate::error::StoreError;
    use crate::port::EntityRepository;
    use std::collections::{BTreeMap, HashMap};
    use std::marker::PhantomData;
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    /// Faults to inject, one per store primitive
    #[derive(Debug, Clone, Default)]
    pub struct Faults {
        pub begin: Option<StoreError>,
        pub exists: Option<StoreError>,
        pub insert: Option<StoreError>,
        pub commit: Option<StoreError>,
        pub rollback: Option<StoreError>,
        /// Applies to every plain (non-transactional) call
        pub query: Option<StoreError>,
    }

    #[derive(Debug, Clone)]
    struct Row {
        id: EntityId,
        name: String,
        created_at: i64,
        updated_at: i64,
    }

    impl Row {
        fn to_entity<K: EntityKind>(&self) -> Entity<K> {
            Entity::from_parts(self.id, self.name.clone(), self.created_at, self.updated_at)
        }
    }

    #[derive(Debug, Default)]
    struct State {
        rows: BTreeMap<EntityId, Row>,
        pending: HashMap<u64, Vec<Row>>,
        last_id: EntityId,
        last_tx: u64,
        begins: usize,
        commits: usize,
        rollbacks: usize,
        open: usize,
    }

    fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
        state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// In-memory entity store with read-committed visibility.
    ///
    /// Without `with_unique_names` it behaves like a table with no unique
    /// index: two interleaved transactions can both insert the same name.
    pub struct InMemoryEntityStore<K: EntityKind> {
        state: Arc<Mutex<State>>,
        faults: Arc<Mutex<Faults>>,
        unique_names: bool,
        kind: PhantomData<K>,
    }

    impl<K: EntityKind> Default for InMemoryEntityStore<K> {
        fn default() -> Self {
            Self::new()
        }
    }

    impl<K: EntityKind> InMemoryEntityStore<K> {
        pub fn new() -> Self {
            Self {
                state: Arc::new(Mutex::new(State::default())),
                faults: Arc::new(Mutex::new(Faults::default())),
                unique_names: false,
                kind: PhantomData,
            }
        }

        /// Reject inserts whose name is already committed or pending elsewhere
        pub fn with_unique_names(mut self) -> Self {
            self.unique_names = true;
            self
        }

        pub fn with_faults(self, faults: Faults) -> Self {
            self.set_faults(faults);
            self
        }

        pub fn set_faults(&self, faults: Faults) {
            *self.faults.lock().unwrap_or_else(PoisonError::into_inner) = faults;
        }

        fn faults(&self) -> Faults {
            self.faults
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Insert a committed row directly, bypassing transactions
        pub fn seed(&self, name: &str, now: i64) -> EntityId {
            let mut state = lock(&self.state);
            state.last_id += 1;
            let id = state.last_id;
            state.rows.insert(
                id,
                Row {
                    id,
                    name: name.to_string(),
                    created_at: now,
                    updated_at: now,
                },
            );
            id
        }

        /// Committed names in ID order
        pub fn names(&self) -> Vec<String> {
            lock(&self.state)
                .rows
                .values()
                .map(|row| row.name.clone())
                .collect()
        }

        pub fn begin_count(&self) -> usize {
            lock(&self.state).begins
        }

        /// Commit calls, successful or not
        pub fn commit_count(&self) -> usize {
            lock(&self.state).commits
        }

        /// Rollback calls, successful or not
        pub fn rollback_count(&self) -> usize {
            lock(&self.state).rollbacks
        }

        /// Transactions begun and not yet dropped
        pub fn open_transactions(&self) -> usize {
            lock(&self.state).open
        }

        fn check_query_fault(&self) -> StoreResult<()> {
            match self.faults().query {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<K: EntityKind> TransactionalEntityStore<K> for InMemoryEntityStore<K> {
        async fn begin_transaction(&self) -> StoreResult<Box<dyn EntityTransaction<K>>> {
            let faults = self.faults();
            if let Some(err) = faults.begin.clone() {
                return Err(err);
            }

            let mut state = lock(&self.state);
            state.begins += 1;
            state.open += 1;
            state.last_tx += 1;
            let tx_id = state.last_tx;
            state.pending.insert(tx_id, Vec::new());

            Ok(Box::new(InMemoryTransaction::<K> {
                tx_id,
                state: Arc::clone(&self.state),
                faults,
                unique_names: self.unique_names,
                kind: PhantomData,
            }))
        }
    }

    #[async_trait]
    impl<K: EntityKind> EntityRepository<K> for InMemoryEntityStore<K> {
        async fn find_by_id(&self, id: EntityId) -> StoreResult<Option<Entity<K>>> {
            self.check_query_fault()?;
            Ok(lock(&self.state).rows.get(&id).map(Row::to_entity))
        }

        async fn find_all(&self) -> StoreResult<Vec<Entity<K>>> {
            self.check_query_fault()?;
            Ok(lock(&self.state).rows.values().map(Row::to_entity).collect())
        }

        async fn find_by_ids(&self, ids: &[EntityId]) -> StoreResult<Vec<Entity<K>>> {
            self.check_query_fault()?;
            Ok(lock(&self.state)
                .rows
                .values()
                .filter(|row| ids.contains(&row.id))
                .map(Row::to_entity)
                .collect())
        }

        async fn delete_by_id(&self, id: EntityId) -> StoreResult<u64> {
            self.check_query_fault()?;
            Ok(u64::from(lock(&self.state).rows.remove(&id).is_some()))
        }

        async fn delete_by_ids(&self, ids: &[EntityId]) -> StoreResult<u64> {
            self.check_query_fault()?;
            let mut state = lock(&self.state);
            let before = state.rows.len();
            state.rows.retain(|id, _| !ids.contains(id));
            Ok((before - state.rows.len()) as u64)
        }
    }

    /// Transaction handle over [`InMemoryEntityStore`]
    pub struct InMemoryTransaction<K: EntityKind> {
        tx_id: u64,
        state: Arc<Mutex<State>>,
        faults: Faults,
        unique_names: bool,
        kind: PhantomData<K>,
    }

    #[async_trait]
    impl<K: EntityKind> Transaction for InMemoryTransaction<K> {
        async fn commit(self: Box<Self>) -> StoreResult<()> {
            let mut state = lock(&self.state);
            state.commits += 1;
            let rows = state.pending.remove(&self.tx_id).unwrap_or_default();

            // A failed commit discards the pending writes.
            if let Some(err) = self.faults.commit.clone() {
                return Err(err);
            }

            for row in rows {
                state.rows.insert(row.id, row);
            }
            Ok(())
        }

        async fn rollback(self: Box<Self>) -> StoreResult<()> {
            let mut state = lock(&self.state);
            state.rollbacks += 1;
            state.pending.remove(&self.tx_id);

            match self.faults.rollback.clone() {
                Some(err) => Err(err),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl<K: EntityKind> EntityTransaction<K> for InMemoryTransaction<K> {
        async fn exists_by_name(&mut self, name: &str) -> StoreResult<bool> {
            if let Some(err) = self.faults.exists.clone() {
                return Err(err);
            }

            let state = lock(&self.state);
            let committed = state.rows.values().any(|row| row.name == name);
            let own = state
                .pending
                .get(&self.tx_id)
                .is_some_and(|rows| rows.iter().any(|row| row.name == name));
            Ok(committed || own)
        }

        async fn insert(&mut self, entity: &mut Entity<K>) -> StoreResult<()> {
            if let Some(err) = self.faults.insert.clone() {
                return Err(err);
            }

            let mut state = lock(&self.state);
            if self.unique_names {
                let taken = state.rows.values().any(|row| row.name == entity.name)
                    || state
                        .pending
                        .values()
                        .flatten()
                        .any(|row| row.name == entity.name);
                if taken {
                    return Err(StoreError::UniqueViolation(format!(
                        "UNIQUE constraint failed: {}.name",
                        K::TABLE
                    )));
                }
            }

            state.last_id += 1;
            let id = state.last_id;
            state.pending.entry(self.tx_id).or_default().push(Row {
                id,
                name: entity.name.clone(),
                created_at: entity.created_at,
                updated_at: entity.updated_at,
            });
            entity.id = Some(id);
            Ok(())
        }
    }

    impl<K: EntityKind> Drop for InMemoryTransaction<K> {
        fn drop(&mut self) {
            let mut state = lock(&self.state);
            state.pending.remove(&self.tx_id);
            state.open = state.open.saturating_sub(1);
        }
    }
}
