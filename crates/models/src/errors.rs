use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("constraint violation: {0}")]
    Constraint(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ModelError {
    /// Classify a store error; FK and unique violations are kept apart from other failures.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::Constraint(msg),
            Some(SqlErr::UniqueConstraintViolation(msg)) => Self::Constraint(msg),
            _ => Self::Db(err.to_string()),
        }
    }
}

/// Column constraints checked before a round-trip: NOT NULL (blank) and the
/// declared length in characters. Both surface as constraint violations.
pub fn check_len(field: &str, value: &str, max: usize) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Constraint(format!("{field} is required")));
    }
    if value.chars().count() > max {
        return Err(ModelError::Constraint(format!("{field} longer than {max} characters")));
    }
    Ok(())
}
