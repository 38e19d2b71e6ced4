//! Create `system_log` table with FK to `app_user`.
//!
//! Deleting a user removes its logs (ON DELETE CASCADE).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SystemLog::Table)
                    .if_not_exists()
                    .col(pk_auto(SystemLog::Id))
                    .col(string_len(SystemLog::LogSerial, 10).not_null())
                    .col(string_len(SystemLog::Description, 250).not_null())
                    .col(timestamp_with_time_zone(SystemLog::LogDateTime).not_null())
                    .col(integer(SystemLog::UserId).not_null())
                    // target of the raw-statement soft delete
                    .col(boolean(SystemLog::Deleted).not_null().default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_system_log_app_user")
                            .from(SystemLog::Table, SystemLog::UserId)
                            .to(AppUser::Table, AppUser::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(SystemLog::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum SystemLog { Table, Id, LogSerial, Description, LogDateTime, UserId, Deleted }

#[derive(DeriveIden)]
enum AppUser { Table, Id }
