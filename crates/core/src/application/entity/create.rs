// Create-if-absent Use Case

use super::requests::CreateEntityRequest;
use crate::domain::{Entity, EntityKind, EntityResponse};
use crate::error::{AppError, Result, StoreError, TxPhase};
use crate::port::{EntityTransaction, TimeProvider, TransactionalEntityStore, Validator};
use tracing::{debug, error, info, instrument, warn};

/// Execute create use case.
///
/// The existence check and the insert run in one transaction. Every path
/// that fails after `begin` ends the transaction exactly once: rollback on
/// check/insert failure, nothing further after a failed commit. When the
/// rollback itself fails the result aggregates the original cause and the
/// rollback failure.
///
/// # Arguments
///
/// * `store` - Transactional entity store
/// * `validator` - Request validator
/// * `time_provider` - Clock for `created_at`/`updated_at` (injected for determinism)
/// * `req` - Create request
#[instrument(skip_all, fields(entity = K::NAME))]
pub async fn execute<K: EntityKind>(
    store: &dyn TransactionalEntityStore<K>,
    validator: &dyn Validator,
    time_provider: &dyn TimeProvider,
    req: CreateEntityRequest,
) -> Result<EntityResponse> {
    // 1. Validate (no transaction is opened for a bad request)
    validator.validate(&req)?;
    let name = req.name.trim().to_string();

    // 2. Begin
    let mut tx = store
        .begin_transaction()
        .await
        .map_err(|e| AppError::transaction(TxPhase::Begin, e))?;

    // 3. Check
    let exists = match tx.exists_by_name(&name).await {
        Ok(exists) => exists,
        Err(e) => return Err(abort(tx, AppError::Repository(e)).await),
    };
    if exists {
        debug!(name = %name, "Name already taken");
        let cause = AppError::AlreadyExists {
            entity: K::NAME,
            name,
        };
        return Err(abort(tx, cause).await);
    }

    // 4. Insert
    let mut entity = Entity::<K>::new(name, time_provider.now_millis());
    if let Err(e) = tx.insert(&mut entity).await {
        let cause = match e {
            // Lost a race against a concurrent creator: the unique index is
            // the authoritative duplicate check.
            StoreError::UniqueViolation(_) => AppError::AlreadyExists {
                entity: K::NAME,
                name: entity.name.clone(),
            },
            other => AppError::Repository(other),
        };
        return Err(abort(tx, cause).await);
    }

    // 5. Commit (a failed commit already ended the transaction)
    tx.commit()
        .await
        .map_err(|e| AppError::transaction(TxPhase::Commit, e))?;

    let response = EntityResponse::try_from(&entity)?;
    info!(id = response.id, name = %response.name, "Entity created");
    Ok(response)
}

/// Roll back after `cause` and fold a rollback failure into the result
async fn abort<K: EntityKind>(tx: Box<dyn EntityTransaction<K>>, cause: AppError) -> AppError {
    match tx.rollback().await {
        Ok(()) => {
            warn!(error = %cause, "Create aborted, transaction rolled back");
            cause
        }
        Err(rollback_err) => {
            error!(
                error = %cause,
                rollback_error = %rollback_err,
                "Create aborted and rollback failed"
            );
            AppError::aggregate(
                cause,
                AppError::transaction(TxPhase::Rollback, rollback_err),
            )
        }
    }
}
