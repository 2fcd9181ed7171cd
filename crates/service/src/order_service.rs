use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::{info, instrument};

use models::order::{self, OrderState};
use models::time_format;
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Page, Pagination};
use crate::venue_service;

pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<order::Model>, ServiceError> {
    Ok(order::Entity::find_by_id(id).one(db).await?)
}

/// Orders of `venue_id` starting within `date` (local day), earliest first.
pub async fn find_for_day(db: &DatabaseConnection, venue_id: i32, date: NaiveDate) -> Result<Vec<order::Model>, ServiceError> {
    let from = date.and_hms_opt(0, 0, 0).ok_or_else(|| ServiceError::Validation("invalid date".into()))?;
    let to = date
        .succ_opt()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| ServiceError::Validation("date out of range".into()))?;
    let orders = order::Entity::find()
        .filter(order::Column::VenueId.eq(venue_id))
        .filter(order::Column::StartTime.gte(from))
        .filter(order::Column::StartTime.lt(to))
        .order_by_asc(order::Column::StartTime)
        .all(db)
        .await?;
    Ok(orders)
}

/// One user's orders, most recently placed first.
pub async fn list_by_user(db: &DatabaseConnection, user_id: &str, opts: Pagination) -> Result<Page<order::Model>, ServiceError> {
    let select = order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::OrderTime)
        .order_by_desc(order::Column::Id);
    fetch_page(db, select, opts).await
}

/// Orders waiting for an admin decision, most recently placed first.
pub async fn list_pending(db: &DatabaseConnection, opts: Pagination) -> Result<Page<order::Model>, ServiceError> {
    let select = order::Entity::find()
        .filter(order::Column::State.eq(OrderState::Pending))
        .order_by_desc(order::Column::OrderTime)
        .order_by_desc(order::Column::Id);
    fetch_page(db, select, opts).await
}

/// Orders already approved or finished.
pub async fn list_audited(db: &DatabaseConnection) -> Result<Vec<order::Model>, ServiceError> {
    let orders = order::Entity::find()
        .filter(order::Column::State.is_in([OrderState::Approved, OrderState::Finished]))
        .order_by_desc(order::Column::OrderTime)
        .order_by_desc(order::Column::Id)
        .all(db)
        .await?;
    Ok(orders)
}

/// Place a reservation for the venue called `venue_name`.
///
/// The order starts pending, stamped now, with `total = hours × price`.
#[instrument(skip(db))]
pub async fn submit(
    db: &DatabaseConnection,
    user_id: &str,
    venue_name: &str,
    start_time: NaiveDateTime,
    hours: i32,
) -> Result<order::Model, ServiceError> {
    let venue = venue_service::find_by_name(db, venue_name)
        .await?
        .ok_or_else(|| ServiceError::not_found("venue"))?;
    let created = order::submit(db, user_id, &venue, start_time, hours).await?;
    info!(id = created.id, total = created.total, "order_submitted");
    common::metrics::record("order_submitted");
    Ok(created)
}

/// Rewrite an order with the same rules as [`submit`]; it returns to the pending state.
#[instrument(skip(db))]
pub async fn update_order(
    db: &DatabaseConnection,
    id: i32,
    venue_name: &str,
    start_time: NaiveDateTime,
    hours: i32,
    user_id: &str,
) -> Result<order::Model, ServiceError> {
    order::validate_hours(hours)?;
    let existing = find_by_id(db, id).await?.ok_or_else(|| ServiceError::not_found("order"))?;
    let venue = venue_service::find_by_name(db, venue_name)
        .await?
        .ok_or_else(|| ServiceError::not_found("venue"))?;
    let mut am: order::ActiveModel = existing.into();
    am.venue_id = Set(venue.id);
    am.user_id = Set(user_id.to_string());
    am.start_time = Set(start_time);
    am.hours = Set(hours);
    am.total = Set(order::compute_total(hours, venue.price)?);
    am.state = Set(OrderState::Pending);
    am.order_time = Set(time_format::now());
    let updated = am.update(db).await?;
    info!(total = updated.total, "order_updated");
    Ok(updated)
}

pub async fn delete_order(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = order::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

#[instrument(skip(db))]
async fn set_state(db: &DatabaseConnection, id: i32, state: OrderState) -> Result<order::Model, ServiceError> {
    let mut am: order::ActiveModel = find_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?
        .into();
    am.state = Set(state);
    let updated = am.update(db).await?;
    info!(?state, "order_state_changed");
    Ok(updated)
}

pub async fn approve(db: &DatabaseConnection, id: i32) -> Result<order::Model, ServiceError> {
    let o = set_state(db, id, OrderState::Approved).await?;
    common::metrics::record("order_approved");
    Ok(o)
}

pub async fn finish(db: &DatabaseConnection, id: i32) -> Result<order::Model, ServiceError> {
    set_state(db, id, OrderState::Finished).await
}

pub async fn reject(db: &DatabaseConnection, id: i32) -> Result<order::Model, ServiceError> {
    let o = set_state(db, id, OrderState::Rejected).await?;
    common::metrics::record("order_rejected");
    Ok(o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get_db, suffix};
    use crate::user_service::{create_user, Registration};
    use models::venue::VenueInput;

    async fn seed(db: &DatabaseConnection, price: i32) -> Result<(String, models::venue::Model), anyhow::Error> {
        let uid = format!("ord_{}", suffix());
        create_user(db, Registration {
            user_id: uid.clone(),
            user_name: "Booker".into(),
            password: "Secret123".into(),
            email: "booker@example.com".into(),
            phone: "13800138000".into(),
        }).await?;
        let v = venue_service::create_venue(db, VenueInput {
            venue_name: format!("hall_{}", suffix()),
            description: String::new(),
            price,
            address: "2 Sport St".into(),
            open_time: "09:00".into(),
            close_time: "21:00".into(),
        }, None).await?;
        Ok((uid, v))
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn submit_prices_and_queues() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (uid, v) = seed(&db, 120).await?;

        let o = submit(&db, &uid, &v.venue_name, at(30, 10), 3).await?;
        assert_eq!(o.total, 360);
        assert_eq!(o.state, OrderState::Pending);
        assert_eq!(o.venue_id, v.id);

        assert!(matches!(submit(&db, &uid, "no-such-hall", at(30, 10), 1).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(submit(&db, &uid, &v.venue_name, at(30, 10), 0).await, Err(ServiceError::Model(_))));

        let pending = list_pending(&db, Pagination::new(1, 100)).await?;
        assert!(pending.content.iter().any(|x| x.id == o.id));

        let mine = list_by_user(&db, &uid, Pagination::new(1, 5)).await?;
        assert_eq!(mine.total_items, 1);
        Ok(())
    }

    #[tokio::test]
    async fn state_changes_and_audited_list() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (uid, v) = seed(&db, 10).await?;

        let a = submit(&db, &uid, &v.venue_name, at(1, 9), 1).await?;
        let b = submit(&db, &uid, &v.venue_name, at(1, 11), 1).await?;
        let c = submit(&db, &uid, &v.venue_name, at(1, 13), 1).await?;

        assert_eq!(approve(&db, a.id).await?.state, OrderState::Approved);
        assert_eq!(approve(&db, b.id).await?.state, OrderState::Approved);
        assert_eq!(finish(&db, b.id).await?.state, OrderState::Finished);
        assert_eq!(reject(&db, c.id).await?.state, OrderState::Rejected);

        let audited: Vec<i32> = list_audited(&db).await?.into_iter().map(|o| o.id).collect();
        assert!(audited.contains(&a.id));
        assert!(audited.contains(&b.id));
        assert!(!audited.contains(&c.id));

        assert!(matches!(finish(&db, i32::MAX).await, Err(ServiceError::NotFound(_))));
        assert!(delete_order(&db, c.id).await?);
        assert!(!delete_order(&db, c.id).await?);
        Ok(())
    }

    #[tokio::test]
    async fn day_window_and_update() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
        let db = get_db().await?;
        let (uid, v) = seed(&db, 40).await?;
        let (_, other) = seed(&db, 99).await?;

        let morning = submit(&db, &uid, &v.venue_name, at(30, 0), 2).await?;
        let late = submit(&db, &uid, &v.venue_name, at(30, 23), 1).await?;
        let next_day = submit(&db, &uid, &v.venue_name, at(31, 0), 1).await?;

        let day: Vec<i32> = find_for_day(&db, v.id, at(30, 0).date()).await?.into_iter().map(|o| o.id).collect();
        assert_eq!(day, vec![morning.id, late.id]);
        assert!(!day.contains(&next_day.id));

        approve(&db, late.id).await?;
        let moved = update_order(&db, late.id, &other.venue_name, at(29, 8), 4, &uid).await?;
        assert_eq!(moved.venue_id, other.id);
        assert_eq!(moved.total, 4 * 99);
        assert_eq!(moved.state, OrderState::Pending);
        assert!(matches!(update_order(&db, i32::MAX, &v.venue_name, at(1, 1), 1, &uid).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(update_order(&db, moved.id, "ghost-hall", at(1, 1), 1, &uid).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }
}
