use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Venue::Table)
                    .if_not_exists()
                    .col(pk_auto(Venue::Id))
                    .col(string_len(Venue::VenueName, 128).unique_key().not_null())
                    .col(text(Venue::Description).not_null())
                    .col(integer(Venue::Price).not_null())
                    .col(string_len(Venue::Picture, 255).not_null().default(""))
                    .col(string_len(Venue::Address, 255).not_null())
                    .col(string_len(Venue::OpenTime, 32).not_null())
                    .col(string_len(Venue::CloseTime, 32).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Venue::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Venue {
    Table,
    Id,
    VenueName,
    Description,
    Price,
    Picture,
    Address,
    OpenTime,
    CloseTime,
}
