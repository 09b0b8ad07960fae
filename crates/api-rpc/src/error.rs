//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use walkin_core::error::{AppError, ErrorKind};

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const DUPLICATE: i32 = 4002;
    pub const INVALID_TRANSITION: i32 = 4004;
    pub const QUEUE_HALTED: i32 = 4005;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    let code = match err.kind() {
        ErrorKind::Validation => code::VALIDATION_ERROR,
        ErrorKind::NotFound => code::NOT_FOUND,
        ErrorKind::Duplicate => code::DUPLICATE,
        ErrorKind::InvalidTransition => code::INVALID_TRANSITION,
        ErrorKind::QueueHalted => code::QUEUE_HALTED,
        ErrorKind::Persistence => code::DB_ERROR,
        ErrorKind::Internal => code::INTERNAL_ERROR,
    };
    ErrorObjectOwned::owned(code, err.to_string(), None::<()>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use walkin_core::domain::DomainError;

    #[test]
    fn test_codes_follow_error_kind() {
        let cases = [
            (AppError::Validation("x".into()), code::VALIDATION_ERROR),
            (AppError::NotFound("x".into()), code::NOT_FOUND),
            (AppError::Duplicate("x".into()), code::DUPLICATE),
            (AppError::QueueHalted("x".into()), code::QUEUE_HALTED),
            (AppError::Persistence("x".into()), code::DB_ERROR),
            (AppError::Config("x".into()), code::INTERNAL_ERROR),
            (
                AppError::Domain(DomainError::InvalidTransition {
                    from: "COMPLETED".to_string(),
                    to: "COMPLETED".to_string(),
                }),
                code::INVALID_TRANSITION,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(to_rpc_error(err).code(), expected);
        }
    }

    #[test]
    fn test_message_is_kept() {
        let err = to_rpc_error(AppError::NotFound("Ticket t-9 not found".into()));
        assert!(err.message().contains("t-9"));
    }
}
