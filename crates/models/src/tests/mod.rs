


use crate::db::{connect_with_config, DatabaseConfig};
use chrono::{TimeZone, Utc};
use migration::MigratorTrait;
use sea_orm::{prelude::DateTimeWithTimeZone, DatabaseConnection};

/// Fresh in-memory database with the schema applied.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = connect_with_config(&DatabaseConfig::in_memory_sqlite()).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// Whole-second timestamps survive every backend unchanged.
pub(crate) fn ts(hour: u32) -> DateTimeWithTimeZone {
    Utc.with_ymd_and_hms(2025, 4, 11, hour, 57, 47).unwrap().into()
}
