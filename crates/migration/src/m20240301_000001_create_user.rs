//! Create `user` table.
//!
//! `user_id` is the login name and the target of message/order foreign keys.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::UserId, 64).unique_key().not_null())
                    .col(string_len(User::UserName, 128).not_null())
                    .col(string_len(User::Password, 255).not_null())
                    .col(string_len(User::Email, 255).not_null())
                    .col(string_len(User::Phone, 32).not_null())
                    .col(boolean(User::IsAdmin).not_null().default(false))
                    .col(string_len(User::Picture, 255).not_null().default(""))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(User::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum User { Table, Id, UserId, UserName, Password, Email, Phone, IsAdmin, Picture }
