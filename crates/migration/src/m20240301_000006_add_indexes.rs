use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Orders: per-user listing and per-venue day lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user")
                    .table(VenueOrder::Table)
                    .col(VenueOrder::UserId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_order_venue_start")
                    .table(VenueOrder::Table)
                    .col(VenueOrder::VenueId)
                    .col(VenueOrder::StartTime)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_order_state")
                    .table(VenueOrder::Table)
                    .col(VenueOrder::State)
                    .to_owned(),
            )
            .await?;

        // Messages: moderation queues and per-user listing
        manager
            .create_index(
                Index::create()
                    .name("idx_message_state_time")
                    .table(Message::Table)
                    .col(Message::State)
                    .col(Message::Time)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_message_user")
                    .table(Message::Table)
                    .col(Message::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_news_time")
                    .table(News::Table)
                    .col(News::Time)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_order_user").table(VenueOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_venue_start").table(VenueOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_state").table(VenueOrder::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_state_time").table(Message::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_message_user").table(Message::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_news_time").table(News::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VenueOrder { Table, UserId, VenueId, StartTime, State }

#[derive(DeriveIden)]
enum Message { Table, UserId, State, Time }

#[derive(DeriveIden)]
enum News { Table, Time }
