use sea_orm::{entity::prelude::*, sea_query::ForeignKeyAction, Set};
use serde::{Deserialize, Serialize};

use crate::app_user;
use crate::errors::{check_len, ModelError};

pub const LOG_SERIAL_MAX: usize = 10;
pub const DESCRIPTION_MAX: usize = 250;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub log_serial: String,
    pub description: String,
    pub log_date_time: DateTimeWithTimeZone,
    pub user_id: i32,
    pub deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { AppUser }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::AppUser => Entity::belongs_to(app_user::Entity)
                .from(Column::UserId)
                .to(app_user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
        }
    }
}

impl Related<app_user::Entity> for Entity {
    fn to() -> RelationDef { Relation::AppUser.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(log_serial: &str, description: &str) -> Result<(), ModelError> {
    check_len("log_serial", log_serial, LOG_SERIAL_MAX)?;
    check_len("description", description, DESCRIPTION_MAX)
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    log_serial: &str,
    description: &str,
    log_date_time: DateTimeWithTimeZone,
    user_id: i32,
) -> Result<Model, ModelError> {
    validate(log_serial, description)?;
    let am = ActiveModel {
        log_serial: Set(log_serial.to_string()),
        description: Set(description.to_string()),
        log_date_time: Set(log_date_time),
        user_id: Set(user_id),
        deleted: Set(false),
        ..Default::default()
    };
    am.insert(db).await.map_err(ModelError::from_db)
}
