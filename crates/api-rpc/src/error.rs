//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes. Clients branch on the
//! code; the message is for humans and the data carries structured detail.

use jsonrpsee::types::ErrorObjectOwned;
use roster_core::error::{AppError, ErrorKind};
use serde_json::json;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const TRANSACTION_ERROR: i32 = 5002;
}

/// Error code for an error kind
pub fn code_for(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::Validation => code::VALIDATION_ERROR,
        ErrorKind::NotFound => code::NOT_FOUND,
        ErrorKind::AlreadyExists => code::CONFLICT,
        ErrorKind::Repository | ErrorKind::Aggregate => code::DB_ERROR,
        ErrorKind::Transaction => code::TRANSACTION_ERROR,
        ErrorKind::Config | ErrorKind::Internal => code::INTERNAL_ERROR,
    }
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = code_for(err.kind());
    let message = err.to_string();

    match err {
        AppError::Validation(errors) => ErrorObjectOwned::owned(code, message, Some(errors)),
        AppError::Aggregate { primary, secondary } => {
            let data = json!({
                "primary": { "code": code_for(primary.kind()), "message": primary.to_string() },
                "secondary": { "code": code_for(secondary.kind()), "message": secondary.to_string() },
            });
            ErrorObjectOwned::owned(code, message, Some(data))
        }
        _ => ErrorObjectOwned::owned(code, message, None::<()>),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::application::{CreateEntityRequest, IdsRequest};
    use roster_core::domain::Validate;
    use roster_core::error::{StoreError, TxPhase};
    use roster_core::port::{RuleValidator, Validator};
    use serde_json::Value;

    fn data(err: &ErrorObjectOwned) -> Value {
        serde_json::from_str(err.data().expect("error data").get()).unwrap()
    }

    fn validation_error(req: &dyn Validate) -> AppError {
        AppError::from(RuleValidator.validate(req).unwrap_err())
    }

    #[test]
    fn test_validation_error_carries_violations() {
        let err = to_rpc_error(validation_error(&IdsRequest::new(vec![5, 0])));

        assert_eq!(err.code(), code::VALIDATION_ERROR);
        let data = data(&err);
        assert_eq!(data[0]["field"], "ids[1]");
        assert_eq!(data[0]["rule"]["rule"], "gt");
        assert_eq!(data[0]["rule"]["param"], 0);
    }

    #[test]
    fn test_conflict_and_not_found_codes() {
        let dup = to_rpc_error(AppError::AlreadyExists {
            entity: "role",
            name: "Ops".to_string(),
        });
        assert_eq!(dup.code(), code::CONFLICT);
        assert_eq!(dup.message(), "role with name 'Ops' already exists");
        assert!(dup.data().is_none());

        let missing = to_rpc_error(AppError::NotFound {
            entity: "employee",
            id: 3,
        });
        assert_eq!(missing.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_transaction_error_code() {
        let err = to_rpc_error(AppError::transaction(
            TxPhase::Commit,
            StoreError::Commit("disk full".to_string()),
        ));
        assert_eq!(err.code(), code::TRANSACTION_ERROR);
        assert!(err.message().contains("disk full"));
    }

    #[test]
    fn test_aggregate_keeps_both_causes() {
        let err = to_rpc_error(AppError::aggregate(
            AppError::Repository(StoreError::Query("insert failed".to_string())),
            AppError::transaction(
                TxPhase::Rollback,
                StoreError::Rollback("rollback failed".to_string()),
            ),
        ));

        assert_eq!(err.code(), code::DB_ERROR);
        let data = data(&err);
        assert_eq!(data["primary"]["code"], code::DB_ERROR);
        assert!(data["primary"]["message"]
            .as_str()
            .unwrap()
            .contains("insert failed"));
        assert_eq!(data["secondary"]["code"], code::TRANSACTION_ERROR);
        assert!(data["secondary"]["message"]
            .as_str()
            .unwrap()
            .contains("rollback failed"));
    }

    #[test]
    fn test_blank_name_maps_to_validation_code() {
        let err = to_rpc_error(validation_error(&CreateEntityRequest::new("  ")));
        assert_eq!(err.code(), code::VALIDATION_ERROR);
        assert_eq!(data(&err)[0]["rule"]["rule"], "required");
    }
}
