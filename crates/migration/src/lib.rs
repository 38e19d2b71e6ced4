//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20250411_000001_create_app_user;
mod m20250411_000002_create_system_log;
mod m20250411_000003_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250411_000001_create_app_user::Migration),
            Box::new(m20250411_000002_create_system_log::Migration),
            // Indexes should always be applied last
            Box::new(m20250411_000003_add_indexes::Migration),
        ]
    }
}
