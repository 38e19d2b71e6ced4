//! Inputs accepted by the services and the named records their queries return.

use chrono::Utc;
use models::{app_user, system_log};
use sea_orm::{prelude::DateTimeWithTimeZone, FromQueryResult};
use serde::{Deserialize, Serialize};

/// A log to insert; the key is assigned by the store.
#[derive(Clone, Debug, Deserialize)]
pub struct NewLog {
    pub log_serial: String,
    pub description: String,
    pub log_date_time: DateTimeWithTimeZone,
    pub user_id: i32,
}

/// Fields overwritten by a log update. Owner and key never change.
#[derive(Clone, Debug, Deserialize)]
pub struct LogPatch {
    pub log_serial: String,
    pub description: String,
    pub log_date_time: DateTimeWithTimeZone,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email_address: String,
    pub password: String,
    pub register_date: DateTimeWithTimeZone,
}

impl NewUser {
    /// A user registered now.
    pub fn new(username: impl Into<String>, email_address: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email_address: email_address.into(),
            password: password.into(),
            register_date: Utc::now().into(),
        }
    }
}

/// Fields overwritten by a user update.
#[derive(Clone, Debug, Deserialize)]
pub struct UserPatch {
    pub username: String,
    pub email_address: String,
    pub password: String,
}

/// `id` + `description` projection of a log.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct LogSummary {
    pub id: i32,
    pub description: String,
}

/// Number of logs owned by one user.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct UserLogCount {
    pub user_id: i32,
    pub log_count: i64,
}

/// A log description joined with its owner's identity.
#[derive(Clone, Debug, PartialEq, Eq, FromQueryResult, Serialize)]
pub struct LogWithOwner {
    pub description: String,
    pub username: String,
    pub email_address: String,
}

/// A user with its logs eager-loaded, logs ordered by key.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UserWithLogs {
    #[serde(flatten)]
    pub user: app_user::Model,
    pub logs: Vec<system_log::Model>,
}

impl From<(app_user::Model, Vec<system_log::Model>)> for UserWithLogs {
    fn from((user, mut logs): (app_user::Model, Vec<system_log::Model>)) -> Self {
        logs.sort_by_key(|l| l.id);
        Self { user, logs }
    }
}
