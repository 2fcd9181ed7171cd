use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};

use models::venue::{self, VenueInput};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Page, Pagination};

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<venue::Model>, ServiceError> {
    Ok(venue::Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<venue::Model>, ServiceError> {
    Ok(venue::find_by_name(db, name).await?)
}

/// Venues by id ascending.
pub async fn list_venues(db: &DatabaseConnection, opts: Pagination) -> Result<Page<venue::Model>, ServiceError> {
    let select = venue::Entity::find().order_by_asc(venue::Column::Id);
    fetch_page(db, select, opts).await
}

pub async fn all_venues(db: &DatabaseConnection) -> Result<Vec<venue::Model>, ServiceError> {
    Ok(venue::Entity::find().order_by_asc(venue::Column::Id).all(db).await?)
}

pub async fn count_venue_name(db: &DatabaseConnection, name: &str) -> Result<u64, ServiceError> {
    let n = venue::Entity::find()
        .filter(venue::Column::VenueName.eq(name))
        .count(db)
        .await?;
    Ok(n)
}

pub async fn is_venue_name_available(db: &DatabaseConnection, name: &str) -> Result<bool, ServiceError> {
    Ok(count_venue_name(db, name).await? == 0)
}

#[instrument(skip(db, input), fields(venue_name = %input.venue_name))]
pub async fn create_venue(db: &DatabaseConnection, input: VenueInput, picture: Option<String>) -> Result<venue::Model, ServiceError> {
    venue::validate_input(&input)?;
    if !is_venue_name_available(db, &input.venue_name).await? {
        return Err(ServiceError::Conflict(format!("venue {} already exists", input.venue_name)));
    }
    let created = venue::create(db, input, picture.unwrap_or_default()).await?;
    info!(id = created.id, "venue_created");
    Ok(created)
}

/// Overwrite the editable fields; the picture is replaced only when a new one was uploaded.
#[instrument(skip(db, input), fields(venue_name = %input.venue_name))]
pub async fn update_venue(
    db: &DatabaseConnection,
    id: i32,
    input: VenueInput,
    picture: Option<String>,
) -> Result<venue::Model, ServiceError> {
    venue::validate_input(&input)?;
    let existing = find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("venue"))?;
    if existing.venue_name != input.venue_name && !is_venue_name_available(db, &input.venue_name).await? {
        return Err(ServiceError::Conflict(format!("venue {} already exists", input.venue_name)));
    }
    let mut am: venue::ActiveModel = existing.into();
    am.venue_name = Set(input.venue_name);
    am.description = Set(input.description);
    am.price = Set(input.price);
    am.address = Set(input.address);
    am.open_time = Set(input.open_time);
    am.close_time = Set(input.close_time);
    if let Some(p) = picture {
        am.picture = Set(p);
    }
    let updated = am.update(db).await?;
    info!("venue_updated");
    Ok(updated)
}

/// Hard delete; orders of the venue go with it.
pub async fn delete_venue(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = venue::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
