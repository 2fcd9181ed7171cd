//! Create `venue_order` table with FKs to `user.user_id` and `venue.id`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VenueOrder::Table)
                    .if_not_exists()
                    .col(pk_auto(VenueOrder::Id))
                    .col(string_len(VenueOrder::UserId, 64).not_null())
                    .col(integer(VenueOrder::VenueId).not_null())
                    .col(integer(VenueOrder::State).not_null())
                    .col(date_time(VenueOrder::OrderTime).not_null())
                    .col(date_time(VenueOrder::StartTime).not_null())
                    .col(integer(VenueOrder::Hours).not_null())
                    .col(integer(VenueOrder::Total).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(VenueOrder::Table, VenueOrder::UserId)
                            .to(User::Table, User::UserId)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_venue")
                            .from(VenueOrder::Table, VenueOrder::VenueId)
                            .to(Venue::Table, Venue::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(VenueOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum VenueOrder {
    Table,
    Id,
    UserId,
    VenueId,
    State,
    OrderTime,
    StartTime,
    Hours,
    Total,
}

#[derive(DeriveIden)]
enum User { Table, UserId }

#[derive(DeriveIden)]
enum Venue { Table, Id }
