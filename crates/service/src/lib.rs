//! Service layer providing the log / user data-access contracts on top of models.
//! - Every operation takes the relational context explicitly: a `DatabaseConnection`
//!   (autocommit per call) or a `DatabaseTransaction` (caller-owned unit of work).
//! - Reuses validation and entity definitions in `models` crate.
//! - Query projections come back as named records from [`domain`].

pub mod errors;
pub mod domain;
pub mod log_service;
pub mod user_service;
pub mod repository;
#[cfg(test)]
pub mod test_support;
