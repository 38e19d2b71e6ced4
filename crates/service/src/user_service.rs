use models::{app_user, system_log};
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use tracing::{info, instrument, warn};

use crate::domain::{NewUser, UserPatch, UserWithLogs};
use crate::errors::ServiceError;

const ENTITY: &str = "app_user";

/// Insert a user and return its generated key.
#[instrument(skip_all)]
pub async fn save_user<C: ConnectionTrait>(db: &C, input: NewUser) -> Result<i32, ServiceError> {
    let created = app_user::create(
        db,
        &input.username,
        &input.email_address,
        &input.password,
        input.register_date,
    )
    .await?;
    info!(user_id = created.id, "app_user_saved");
    Ok(created.id)
}

/// Overwrite `username`, `email_address` and `password`.
///
/// Absence is decided on the row loaded from the store.
#[instrument(skip(db, patch))]
pub async fn update_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
    patch: UserPatch,
) -> Result<i32, ServiceError> {
    app_user::validate(&patch.username, &patch.email_address, &patch.password)?;
    let mut am: app_user::ActiveModel = app_user::Entity::find_by_id(id)
        .one(db).await.map_err(ServiceError::db)?
        .ok_or_else(|| {
            warn!(user_id = id, "app_user_update_target_missing");
            ServiceError::not_found(ENTITY)
        })?
        .into();
    am.username = Set(patch.username);
    am.email_address = Set(patch.email_address);
    am.password = Set(patch.password);
    let updated = am.update(db).await.map_err(ServiceError::db)?;
    info!(user_id = updated.id, "app_user_updated");
    Ok(updated.id)
}

/// Set `deleted = true`. The row and its logs stay.
#[instrument(skip(db))]
pub async fn soft_delete_user<C: ConnectionTrait>(db: &C, id: i32) -> Result<i32, ServiceError> {
    let updated = app_user::soft_delete(db, id).await?;
    info!(user_id = updated.id, "app_user_soft_deleted");
    Ok(updated.id)
}

/// Get a user by id.
pub async fn find_user<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<app_user::Model>, ServiceError> {
    app_user::Entity::find_by_id(id).one(db).await.map_err(ServiceError::db)
}

/// All users in key order, soft-deleted ones included.
pub async fn list_users<C: ConnectionTrait>(db: &C) -> Result<Vec<app_user::Model>, ServiceError> {
    app_user::Entity::find()
        .order_by_asc(app_user::Column::Id)
        .all(db)
        .await
        .map_err(ServiceError::db)
}

/// A user with its logs eager-loaded.
pub async fn find_user_with_logs<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<UserWithLogs>, ServiceError> {
    let rows = app_user::Entity::find_by_id(id)
        .find_with_related(system_log::Entity)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(rows.into_iter().next().map(UserWithLogs::from))
}

/// Every user with its logs eager-loaded, users in key order.
pub async fn list_users_with_logs<C: ConnectionTrait>(db: &C) -> Result<Vec<UserWithLogs>, ServiceError> {
    let rows = app_user::Entity::find()
        .order_by_asc(app_user::Column::Id)
        .find_with_related(system_log::Entity)
        .all(db)
        .await
        .map_err(ServiceError::db)?;
    Ok(rows.into_iter().map(UserWithLogs::from).collect())
}
