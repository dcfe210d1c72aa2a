// Central Error Types for the Application

use crate::domain::ValidationErrors;
use std::fmt;
use thiserror::Error;

/// Failure reported by a store port.
///
/// Every variant carries the driver message verbatim so callers can surface
/// the original cause without re-reading logs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("commit error: {0}")]
    Commit(String),

    #[error("rollback error: {0}")]
    Rollback(String),
}

/// Result type for store ports
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Transaction lifecycle step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxPhase {
    Begin,
    Commit,
    Rollback,
}

impl fmt::Display for TxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxPhase::Begin => write!(f, "begin"),
            TxPhase::Commit => write!(f, "commit"),
            TxPhase::Rollback => write!(f, "rollback"),
        }
    }
}

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{entity} with name '{name}' already exists")]
    AlreadyExists { entity: &'static str, name: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Repository error: {0}")]
    Repository(#[source] StoreError),

    #[error("Transaction {phase} failed: {source}")]
    Transaction {
        phase: TxPhase,
        #[source]
        source: StoreError,
    },

    /// Two independent failures, typically the original cause followed by
    /// the rollback failure that happened while cleaning up after it.
    #[error("{primary}; {secondary}")]
    Aggregate {
        #[source]
        primary: Box<AppError>,
        secondary: Box<AppError>,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Fieldless classification of [`AppError`], used by callers to pick an
/// external status without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    AlreadyExists,
    NotFound,
    Repository,
    Transaction,
    Aggregate,
    Config,
    Internal,
}

impl AppError {
    pub fn transaction(phase: TxPhase, source: StoreError) -> Self {
        AppError::Transaction { phase, source }
    }

    pub fn aggregate(primary: AppError, secondary: AppError) -> Self {
        AppError::Aggregate {
            primary: Box::new(primary),
            secondary: Box::new(secondary),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Repository(_) => ErrorKind::Repository,
            AppError::Transaction { .. } => ErrorKind::Transaction,
            AppError::Aggregate { .. } => ErrorKind::Aggregate,
            AppError::Config(_) => ErrorKind::Config,
            AppError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// First cause of an aggregate
    pub fn primary(&self) -> Option<&AppError> {
        match self {
            AppError::Aggregate { primary, .. } => Some(primary),
            _ => None,
        }
    }

    /// Second cause of an aggregate
    pub fn secondary(&self) -> Option<&AppError> {
        match self {
            AppError::Aggregate { secondary, .. } => Some(secondary),
            _ => None,
        }
    }

    /// True for failures caused by the request itself (bad input, conflict,
    /// missing entity) rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::AlreadyExists | ErrorKind::NotFound
        )
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
