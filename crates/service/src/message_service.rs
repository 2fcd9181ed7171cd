use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::message::{self, MessageState};
use models::time_format;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Page, Pagination};

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<message::Model>, ServiceError> {
    Ok(message::Entity::find_by_id(id).one(db).await?)
}

async fn list_where(
    db: &DatabaseConnection,
    filter: sea_orm::Condition,
    opts: Pagination,
) -> Result<Page<message::Model>, ServiceError> {
    let select = message::Entity::find()
        .filter(filter)
        .order_by_desc(message::Column::Time)
        .order_by_desc(message::Column::Id);
    fetch_page(db, select, opts).await
}

/// All of one user's messages whatever their state, newest first.
pub async fn list_by_user(db: &DatabaseConnection, user_id: &str, opts: Pagination) -> Result<Page<message::Model>, ServiceError> {
    list_where(db, sea_orm::Condition::all().add(message::Column::UserId.eq(user_id)), opts).await
}

pub async fn list_pending(db: &DatabaseConnection, opts: Pagination) -> Result<Page<message::Model>, ServiceError> {
    list_where(db, sea_orm::Condition::all().add(message::Column::State.eq(MessageState::Pending)), opts).await
}

pub async fn list_approved(db: &DatabaseConnection, opts: Pagination) -> Result<Page<message::Model>, ServiceError> {
    list_where(db, sea_orm::Condition::all().add(message::Column::State.eq(MessageState::Approved)), opts).await
}

#[instrument(skip(db, content))]
pub async fn create_message(db: &DatabaseConnection, user_id: &str, content: &str) -> Result<message::Model, ServiceError> {
    let created = message::create(db, user_id, content).await?;
    info!(id = created.id, "message_posted");
    common::metrics::record("message_posted");
    Ok(created)
}

/// Replace the text. An edited message goes back to moderation.
#[instrument(skip(db, content))]
pub async fn update_message(db: &DatabaseConnection, id: i32, content: &str) -> Result<message::Model, ServiceError> {
    message::validate_content(content)?;
    let mut am: message::ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("message"))?
        .into();
    am.content = Set(content.to_string());
    am.time = Set(time_format::now());
    am.state = Set(MessageState::Pending);
    Ok(am.update(db).await?)
}

pub async fn delete_message(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = message::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[instrument(skip(db))]
async fn set_state(db: &DatabaseConnection, id: i32, state: MessageState) -> Result<message::Model, ServiceError> {
    let mut am: message::ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("message"))?
        .into();
    am.state = Set(state);
    let updated = am.update(db).await?;
    info!(?state, "message_state_changed");
    Ok(updated)
}

pub async fn approve(db: &DatabaseConnection, id: i32) -> Result<message::Model, ServiceError> {
    let m = set_state(db, id, MessageState::Approved).await?;
    common::metrics::record("message_approved");
    Ok(m)
}

pub async fn reject(db: &DatabaseConnection, id: i32) -> Result<message::Model, ServiceError> {
    let m = set_state(db, id, MessageState::Rejected).await?;
    common::metrics::record("message_rejected");
    Ok(m)
}
