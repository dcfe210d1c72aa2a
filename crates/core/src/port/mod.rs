// Port Layer - Interfaces for external dependencies

pub mod entity_repository;
pub mod time_provider; // For deterministic timestamps
pub mod transaction;
pub mod validator;

// Re-exports
pub use entity_repository::EntityRepository;
pub use time_provider::TimeProvider;
pub use transaction::{EntityTransaction, Transaction, TransactionalEntityStore};
pub use validator::{RuleValidator, Validator};
