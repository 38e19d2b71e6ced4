//! Create `app_user` table.
//!
//! Stores application users; `deleted` is the soft-delete marker.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUser::Table)
                    .if_not_exists()
                    .col(pk_auto(AppUser::Id))
                    // no unique key on username / email_address
                    .col(string_len(AppUser::Username, 250).not_null())
                    .col(string_len(AppUser::EmailAddress, 250).not_null())
                    .col(string_len(AppUser::Password, 20).not_null())
                    .col(timestamp_with_time_zone(AppUser::RegisterDate).not_null())
                    .col(boolean(AppUser::Deleted).not_null().default(false))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(AppUser::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum AppUser { Table, Id, Username, EmailAddress, Password, RegisterDate, Deleted }
