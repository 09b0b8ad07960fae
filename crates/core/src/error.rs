// Central Error Type for the Application

use thiserror::Error;

use crate::domain::DomainError;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Queue halted: {0}")]
    QueueHalted(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error taxonomy exposed to transport layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidTransition,
    Persistence,
    Duplicate,
    QueueHalted,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(DomainError::InvalidTransition { .. }) => ErrorKind::InvalidTransition,
            AppError::Domain(DomainError::DuplicateToken(_)) => ErrorKind::Duplicate,
            AppError::Domain(DomainError::Validation(_)) => ErrorKind::Validation,
            AppError::Validation(_) | AppError::Serialization(_) => ErrorKind::Validation,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Persistence(_) => ErrorKind::Persistence,
            AppError::Duplicate(_) => ErrorKind::Duplicate,
            AppError::QueueHalted(_) => ErrorKind::QueueHalted,
            AppError::Config(_) | AppError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

// Note: sqlx::Error conversion is handled in infra-sqlite crate
// by converting to AppError::Persistence / AppError::Duplicate
