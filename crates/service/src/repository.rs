//! Repository contracts over the log and user tables.
//!
//! The SeaORM implementations borrow their relational context, so the caller decides
//! the unit of work: hand them a `DatabaseConnection` for autocommit or a
//! `DatabaseTransaction` and commit it afterwards.

use async_trait::async_trait;
use models::{app_user, system_log};
use sea_orm::ConnectionTrait;

use crate::domain::{LogPatch, LogSummary, LogWithOwner, NewLog, NewUser, UserLogCount, UserPatch, UserWithLogs};
use crate::errors::ServiceError;
use crate::{log_service, user_service};

#[async_trait]
pub trait LogRepository: Send + Sync {
    async fn save(&self, log: NewLog) -> Result<i32, ServiceError>;
    async fn update_by_id(&self, id: i32, patch: LogPatch) -> Result<i32, ServiceError>;
    async fn delete_by_id(&self, id: i32) -> Result<i32, ServiceError>;
    async fn find_by_id_exact(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError>;
    async fn find_by_id_first_match(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError>;
    async fn find_by_id_single_match(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<system_log::Model>, ServiceError>;
    async fn count_by_user(&self, user_id: i32) -> Result<u64, ServiceError>;
    async fn exists_by_id(&self, id: i32) -> Result<bool, ServiceError>;
    /// Raw parameterized statement.
    async fn soft_delete_by_id(&self, id: i32) -> Result<bool, ServiceError>;
    /// Builder-composed statement; same result as [`LogRepository::soft_delete_by_id`].
    async fn soft_delete_by_id_interpolated(&self, id: i32) -> Result<bool, ServiceError>;
    async fn project_id_and_description(&self) -> Result<Vec<LogSummary>, ServiceError>;
    async fn min_id(&self) -> Result<Option<i32>, ServiceError>;
    async fn max_id(&self) -> Result<Option<i32>, ServiceError>;
    async fn average_id(&self) -> Result<Option<f64>, ServiceError>;
    async fn group_count_by_user(&self) -> Result<Vec<UserLogCount>, ServiceError>;
    async fn join_with_owner(&self) -> Result<Vec<LogWithOwner>, ServiceError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save(&self, user: NewUser) -> Result<i32, ServiceError>;
    async fn update_by_id(&self, id: i32, patch: UserPatch) -> Result<i32, ServiceError>;
    /// Soft delete only; there is no hard delete in this contract.
    async fn soft_delete_by_id(&self, id: i32) -> Result<i32, ServiceError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<app_user::Model>, ServiceError>;
    async fn list_all(&self) -> Result<Vec<app_user::Model>, ServiceError>;
    async fn find_by_id_with_logs(&self, id: i32) -> Result<Option<UserWithLogs>, ServiceError>;
    async fn list_all_with_logs(&self) -> Result<Vec<UserWithLogs>, ServiceError>;
}

/// SeaORM-backed log repository over a borrowed context.
pub struct SeaOrmLogRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmLogRepository<'c, C> {
    pub fn new(db: &'c C) -> Self { Self { db } }
}

#[async_trait]
impl<'c, C> LogRepository for SeaOrmLogRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn save(&self, log: NewLog) -> Result<i32, ServiceError> {
        log_service::save_log(self.db, log).await
    }

    async fn update_by_id(&self, id: i32, patch: LogPatch) -> Result<i32, ServiceError> {
        log_service::update_log(self.db, id, patch).await
    }

    async fn delete_by_id(&self, id: i32) -> Result<i32, ServiceError> {
        log_service::delete_log(self.db, id).await
    }

    async fn find_by_id_exact(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError> {
        log_service::find_log_by_id(self.db, id).await
    }

    async fn find_by_id_first_match(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError> {
        log_service::find_log_first_match(self.db, id).await
    }

    async fn find_by_id_single_match(&self, id: i32) -> Result<Option<system_log::Model>, ServiceError> {
        log_service::find_log_single_match(self.db, id).await
    }

    async fn list_all(&self) -> Result<Vec<system_log::Model>, ServiceError> {
        log_service::list_logs(self.db).await
    }

    async fn count_by_user(&self, user_id: i32) -> Result<u64, ServiceError> {
        log_service::count_logs_by_user(self.db, user_id).await
    }

    async fn exists_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        log_service::log_exists(self.db, id).await
    }

    async fn soft_delete_by_id(&self, id: i32) -> Result<bool, ServiceError> {
        log_service::soft_delete_log_raw(self.db, id).await
    }

    async fn soft_delete_by_id_interpolated(&self, id: i32) -> Result<bool, ServiceError> {
        log_service::soft_delete_log_interpolated(self.db, id).await
    }

    async fn project_id_and_description(&self) -> Result<Vec<LogSummary>, ServiceError> {
        log_service::list_log_summaries(self.db).await
    }

    async fn min_id(&self) -> Result<Option<i32>, ServiceError> {
        log_service::min_log_id(self.db).await
    }

    async fn max_id(&self) -> Result<Option<i32>, ServiceError> {
        log_service::max_log_id(self.db).await
    }

    async fn average_id(&self) -> Result<Option<f64>, ServiceError> {
        log_service::average_log_id(self.db).await
    }

    async fn group_count_by_user(&self) -> Result<Vec<UserLogCount>, ServiceError> {
        log_service::count_logs_grouped_by_user(self.db).await
    }

    async fn join_with_owner(&self) -> Result<Vec<LogWithOwner>, ServiceError> {
        log_service::list_logs_with_owner(self.db).await
    }
}

/// SeaORM-backed user repository over a borrowed context.
pub struct SeaOrmUserRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmUserRepository<'c, C> {
    pub fn new(db: &'c C) -> Self { Self { db } }
}

#[async_trait]
impl<'c, C> UserRepository for SeaOrmUserRepository<'c, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn save(&self, user: NewUser) -> Result<i32, ServiceError> {
        user_service::save_user(self.db, user).await
    }

    async fn update_by_id(&self, id: i32, patch: UserPatch) -> Result<i32, ServiceError> {
        user_service::update_user(self.db, id, patch).await
    }

    async fn soft_delete_by_id(&self, id: i32) -> Result<i32, ServiceError> {
        user_service::soft_delete_user(self.db, id).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<app_user::Model>, ServiceError> {
        user_service::find_user(self.db, id).await
    }

    async fn list_all(&self) -> Result<Vec<app_user::Model>, ServiceError> {
        user_service::list_users(self.db).await
    }

    async fn find_by_id_with_logs(&self, id: i32) -> Result<Option<UserWithLogs>, ServiceError> {
        user_service::find_user_with_logs(self.db, id).await
    }

    async fn list_all_with_logs(&self) -> Result<Vec<UserWithLogs>, ServiceError> {
        user_service::list_users_with_logs(self.db).await
    }
}
