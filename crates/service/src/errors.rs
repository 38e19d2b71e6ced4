use models::errors::ModelError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("ambiguous result: {0}")]
    Ambiguous(String),
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn ambiguous(entity: &str) -> Self { Self::Ambiguous(format!("more than one {} matched", entity)) }

    /// Map a store error, keeping constraint violations distinguishable.
    pub fn db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::ConstraintViolation(msg),
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::ConstraintViolation(msg),
            _ => Self::Db(err.to_string()),
        }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::NotFound(_) => 2002,
            ServiceError::Ambiguous(_) => 2003,
            ServiceError::ConstraintViolation(_) => 2101,
            ServiceError::Db(_) => 2200,
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::NotFound(m) => Self::NotFound(m),
            ModelError::Constraint(m) => Self::ConstraintViolation(m),
            ModelError::Db(m) => Self::Db(m),
        }
    }
}
