//! Create `message` table with FK to `user.user_id`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Message::Table)
                    .if_not_exists()
                    .col(pk_auto(Message::Id))
                    .col(string_len(Message::UserId, 64).not_null())
                    .col(text(Message::Content).not_null())
                    .col(date_time(Message::Time).not_null())
                    .col(integer(Message::State).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_message_user")
                            .from(Message::Table, Message::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Message::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Message { Table, Id, UserId, Content, Time, State }

#[derive(DeriveIden)]
enum User { Table, UserId }
