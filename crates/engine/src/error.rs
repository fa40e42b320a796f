//! Errors raised by the record store and the expense service.
//!
//! Store faults are split from caller errors so the HTTP layer can tell a
//! malformed identifier apart from a backend that misbehaved:
//!
//! - [`InvalidId`] is the caller's fault and never an internal error.
//! - [`Database`], [`Unreachable`] and [`Corrupt`] are storage faults.
//!
//!  [`InvalidId`]: StoreError::InvalidId
//!  [`Database`]: StoreError::Database
//!  [`Unreachable`]: StoreError::Unreachable
//!  [`Corrupt`]: StoreError::Corrupt
use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Record store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid expense id: \"{0}\"")]
    InvalidId(String),
    #[error("store unreachable: {0}")]
    Unreachable(String),
    #[error("corrupt record: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

/// Expense service errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidId(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for EngineError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::InvalidId(_) => Self::InvalidId(value.to_string()),
            other => Self::Store(other),
        }
    }
}

impl From<FieldErrors> for EngineError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidId(a), Self::InvalidId(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
