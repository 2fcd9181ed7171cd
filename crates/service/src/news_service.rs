use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};
use tracing::info;

use models::{news, time_format};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Page, Pagination};

/// Newest first.
pub async fn list_news(db: &DatabaseConnection, opts: Pagination) -> Result<Page<news::Model>, ServiceError> {
    let select = news::Entity::find()
        .order_by_desc(news::Column::Time)
        .order_by_desc(news::Column::Id);
    fetch_page(db, select, opts).await
}

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<news::Model>, ServiceError> {
    Ok(news::Entity::find_by_id(id).one(db).await?)
}

pub async fn create_news(db: &DatabaseConnection, title: &str, content: &str) -> Result<news::Model, ServiceError> {
    let created = news::create(db, title, content).await?;
    info!(id = created.id, "news_created");
    Ok(created)
}

/// Rewrite title and content; the timestamp moves to now.
pub async fn update_news(db: &DatabaseConnection, id: i32, title: &str, content: &str) -> Result<news::Model, ServiceError> {
    news::validate(title, content)?;
    let mut am: news::ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("news"))?
        .into();
    am.title = Set(title.to_string());
    am.content = Set(content.to_string());
    am.time = Set(time_format::now());
    Ok(am.update(db).await?)
}

pub async fn delete_news(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = news::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
