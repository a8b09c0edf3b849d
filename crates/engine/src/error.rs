//! The module contains the errors the engine can throw.
//!
//! Reconciliation queries never fail on missing data (they return `None` or
//! empty ledgers); these errors come from the store operations:
//!
//! - [`KeyNotFound`] thrown when a user, schedule or transaction is missing.
//! - [`InvalidSchedule`] thrown when a schedule interval or rate is invalid.
//!
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`InvalidSchedule`]: EngineError::InvalidSchedule
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),
    #[error("Invalid match: {0}")]
    InvalidMatch(String),
    #[error("Invalid date range: {0}")]
    InvalidRange(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::InvalidSchedule(a), Self::InvalidSchedule(b)) => a == b,
            (Self::InvalidMatch(a), Self::InvalidMatch(b)) => a == b,
            (Self::InvalidRange(a), Self::InvalidRange(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
