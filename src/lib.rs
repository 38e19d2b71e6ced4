//! Data-access layer for application users and their system logs.
//!
//! [`open`] wires the ambient pieces together (configuration, logging, connection
//! and schema); the repositories in [`service`] do the actual work.

use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tracing::info;

pub use configs::AppConfig;
pub use models::{app_user, system_log};
pub use service::domain;
pub use service::errors::ServiceError;
pub use service::repository::{LogRepository, SeaOrmLogRepository, SeaOrmUserRepository, UserRepository};

/// Install the tracing subscriber described by `cfg.logging`.
pub fn init_logging(cfg: &AppConfig) {
    let json = cfg.logging.format == configs::LogFormat::Json;
    common::utils::logging::init_logging(json, cfg.logging.filter.as_deref());
}

/// Load `config.toml` (or `CONFIG_PATH`), falling back to the environment alone.
pub fn load_config() -> anyhow::Result<AppConfig> {
    // 提前加载 .env，使得 DATABASE_URL / RUST_LOG 等环境变量生效
    dotenvy::dotenv().ok();
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(_) => AppConfig::from_env(),
    }
}

/// Connect with `cfg` and bring the schema up to date.
pub async fn open(cfg: &AppConfig) -> anyhow::Result<DatabaseConnection> {
    init_logging(cfg);
    let db = models::db::connect_with_config(&models::db::DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;
    info!(event = "schema_ready", "syslog store opened");
    Ok(db)
}
