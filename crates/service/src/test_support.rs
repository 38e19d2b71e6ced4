#![cfg(test)]
use chrono::{TimeZone, Utc};
use sea_orm::{prelude::DateTimeWithTimeZone, DatabaseConnection};
use migration::MigratorTrait;
use models::db::{connect_with_config, DatabaseConfig};

use crate::domain::{NewLog, NewUser};

/// A private in-memory database with the schema applied, one per test.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = connect_with_config(&DatabaseConfig::in_memory_sqlite()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Whole-second timestamp on a fixed day.
pub fn ts(hour: u32) -> DateTimeWithTimeZone {
    Utc.with_ymd_and_hms(2025, 4, 11, hour, 0, 0).unwrap().into()
}

pub fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email_address: format!("{name}@example.com"),
        password: "pa55word".to_string(),
        register_date: ts(8),
    }
}

pub fn new_log(user_id: i32, serial: &str, description: &str) -> NewLog {
    NewLog {
        log_serial: serial.to_string(),
        description: description.to_string(),
        log_date_time: ts(9),
        user_id,
    }
}
