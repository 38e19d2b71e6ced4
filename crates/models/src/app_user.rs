use sea_orm::{entity::prelude::*, Set};
use serde::{Deserialize, Serialize};

use crate::errors::{check_len, ModelError};
use crate::system_log;

pub const USERNAME_MAX: usize = 250;
pub const EMAIL_ADDRESS_MAX: usize = 250;
pub const PASSWORD_MAX: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "app_user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub username: String,
    pub email_address: String,
    // plaintext, kept out of serialized output
    #[serde(skip_serializing)]
    pub password: String,
    pub register_date: DateTimeWithTimeZone,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    SystemLog,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::SystemLog => Entity::has_many(system_log::Entity).into() }
    }
}

impl Related<system_log::Entity> for Entity {
    fn to() -> RelationDef { Relation::SystemLog.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    check_len("username", username, USERNAME_MAX)
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    check_len("email_address", email, EMAIL_ADDRESS_MAX)
}

pub fn validate_password(password: &str) -> Result<(), ModelError> {
    check_len("password", password, PASSWORD_MAX)
}

/// Validate every writable text column of a user.
pub fn validate(username: &str, email: &str, password: &str) -> Result<(), ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    password: &str,
    register_date: DateTimeWithTimeZone,
) -> Result<Model, ModelError> {
    validate(username, email, password)?;
    let am = ActiveModel {
        username: Set(username.to_string()),
        email_address: Set(email.to_string()),
        password: Set(password.to_string()),
        register_date: Set(register_date),
        deleted: Set(false),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}

/// Flip the `deleted` flag; the row and its logs stay in place.
pub async fn soft_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<Model, ModelError> {
    let mut found: ActiveModel = Entity::find_by_id(id)
        .one(db).await.map_err(ModelError::from_db)?
        .ok_or_else(|| ModelError::NotFound("app_user not found".into()))?
        .into();
    found.deleted = Set(true);
    found.update(db).await.map_err(ModelError::from_db)
}

/// Remove the row; the store cascades the delete to owned logs.
pub async fn hard_delete<C: ConnectionTrait>(db: &C, id: i32) -> Result<u64, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await.map_err(ModelError::from_db)?;
    Ok(res.rows_affected)
}
