// Roster Infrastructure - SQLite Adapter
// Implements: EntityRepository, TransactionalEntityStore, EntityTransaction

mod connection;
mod entity_repository;
mod migration;
mod transaction;

pub use connection::create_pool;
pub use entity_repository::SqliteEntityRepository;
pub use migration::{current_version, run_migrations};
pub use transaction::SqliteEntityTransaction;
pub use sqlx::SqlitePool;

// Note: sqlx::Error conversion goes through `map_sqlx_error` because of
// Rust's orphan rules (no From<sqlx::Error> for StoreError in this crate)
