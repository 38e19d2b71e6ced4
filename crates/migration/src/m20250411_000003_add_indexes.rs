use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // SystemLog: non-unique index on user_id
        manager
            .create_index(
                Index::create()
                    .name("idx_system_log_user_id")
                    .table(SystemLog::Table)
                    .col(SystemLog::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_system_log_user_id").table(SystemLog::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SystemLog { Table, UserId }
