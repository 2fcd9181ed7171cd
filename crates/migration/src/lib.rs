//! Migrator registering table migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240301_000001_create_user;
mod m20240301_000002_create_venue;
mod m20240301_000003_create_news;
mod m20240301_000004_create_message;
mod m20240301_000005_create_order;
mod m20240301_000006_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240301_000001_create_user::Migration),
            Box::new(m20240301_000002_create_venue::Migration),
            Box::new(m20240301_000003_create_news::Migration),
            Box::new(m20240301_000004_create_message::Migration),
            Box::new(m20240301_000005_create_order::Migration),
            // Indexes should always be applied last
            Box::new(m20240301_000006_add_indexes::Migration),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::Database;

    #[tokio::test]
    async fn up_and_down_on_sqlite() -> Result<(), DbErr> {
        let db = Database::connect("sqlite::memory:").await?;
        Migrator::up(&db, None).await?;
        let manager = SchemaManager::new(&db);
        for table in ["user", "venue", "news", "message", "venue_order"] {
            assert!(manager.has_table(table).await?, "missing table {table}");
        }
        Migrator::down(&db, None).await?;
        assert!(!manager.has_table("venue_order").await?);
        Ok(())
    }
}
