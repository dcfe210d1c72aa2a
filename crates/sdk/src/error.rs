//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// Error codes returned by the daemon
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const TRANSACTION_ERROR: i32 = 5002;
}

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error object returned by the daemon; `data` holds violations for
    /// validation errors and both causes for aggregated failures.
    #[error("RPC error ({code}): {message}")]
    Rpc {
        code: i32,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl SdkError {
    /// Daemon error code, if the daemon answered with an error
    pub fn code(&self) -> Option<i32> {
        match self {
            SdkError::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.code() == Some(code::NOT_FOUND)
    }

    pub fn is_conflict(&self) -> bool {
        self.code() == Some(code::CONFLICT)
    }

    pub fn is_validation(&self) -> bool {
        self.code() == Some(code::VALIDATION_ERROR)
    }
}

impl From<jsonrpsee::core::ClientError> for SdkError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => SdkError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
                data: call_err
                    .data()
                    .and_then(|raw| serde_json::from_str(raw.get()).ok()),
            },
            jsonrpsee::core::ClientError::Transport(e) => {
                SdkError::Transport(format!("Transport error: {}", e))
            }
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                SdkError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => {
                SdkError::Other(format!("Parse error: {}", e))
            }
            _ => SdkError::Other(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonrpsee::types::ErrorObjectOwned;
    use serde_json::json;

    #[test]
    fn test_call_error_keeps_code_and_data() {
        let call = ErrorObjectOwned::owned(
            code::VALIDATION_ERROR,
            "Validation error: name required (required)",
            Some(json!([{ "field": "name" }])),
        );
        let err = SdkError::from(jsonrpsee::core::ClientError::Call(call));

        assert!(err.is_validation());
        match err {
            SdkError::Rpc { data, .. } => assert_eq!(data.unwrap()[0]["field"], "name"),
            other => panic!("expected rpc error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_rpc_error_has_no_code() {
        let err = SdkError::Connection("refused".to_string());
        assert_eq!(err.code(), None);
        assert!(!err.is_conflict());
    }
}
