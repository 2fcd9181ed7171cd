//! Read models that join a record with a few fields of its related entity for display.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::Serialize;
use tracing::warn;

use models::message::{self, MessageState};
use models::order::{self, OrderState};
use models::{user, venue};
use crate::errors::ServiceError;
use crate::{order_service, venue_service};

/// A message with its author's name and picture.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageVo {
    pub id: i32,
    pub user_id: String,
    pub content: String,
    #[serde(with = "models::time_format")]
    pub time: NaiveDateTime,
    pub user_name: String,
    pub picture: String,
    pub state: MessageState,
}

/// An order with the name of the booked venue.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderVo {
    pub id: i32,
    pub user_id: String,
    pub venue_id: i32,
    pub venue_name: String,
    pub state: OrderState,
    #[serde(with = "models::time_format")]
    pub order_time: NaiveDateTime,
    #[serde(with = "models::time_format")]
    pub start_time: NaiveDateTime,
    pub hours: i32,
    pub total: i32,
}

/// A venue together with its orders for one day.
#[derive(Debug, Clone, Serialize)]
pub struct VenueOrders {
    pub venue: venue::Model,
    pub orders: Vec<order::Model>,
}

/// Attach author details. Authors that no longer exist show up with empty fields.
pub async fn message_vos(db: &DatabaseConnection, messages: Vec<message::Model>) -> Result<Vec<MessageVo>, ServiceError> {
    let mut ids: Vec<String> = messages.iter().map(|m| m.user_id.clone()).collect();
    ids.sort();
    ids.dedup();
    let authors: HashMap<String, user::Model> = if ids.is_empty() {
        HashMap::new()
    } else {
        user::Entity::find()
            .filter(user::Column::UserId.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|u| (u.user_id.clone(), u))
            .collect()
    };

    let vos = messages
        .into_iter()
        .map(|m| {
            let (user_name, picture) = match authors.get(&m.user_id) {
                Some(u) => (u.user_name.clone(), u.picture.clone()),
                None => {
                    warn!(message_id = m.id, user_id = %m.user_id, "message author missing");
                    (String::new(), String::new())
                }
            };
            MessageVo {
                id: m.id,
                user_id: m.user_id,
                content: m.content,
                time: m.time,
                user_name,
                picture,
                state: m.state,
            }
        })
        .collect();
    Ok(vos)
}

/// Attach venue names.
pub async fn order_vos(db: &DatabaseConnection, orders: Vec<order::Model>) -> Result<Vec<OrderVo>, ServiceError> {
    let mut ids: Vec<i32> = orders.iter().map(|o| o.venue_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let venues: HashMap<i32, String> = if ids.is_empty() {
        HashMap::new()
    } else {
        venue::Entity::find()
            .filter(venue::Column::Id.is_in(ids))
            .all(db)
            .await?
            .into_iter()
            .map(|v| (v.id, v.venue_name))
            .collect()
    };

    let vos = orders
        .into_iter()
        .map(|o| {
            let venue_name = venues.get(&o.venue_id).cloned().unwrap_or_else(|| {
                warn!(order_id = o.id, venue_id = o.venue_id, "order venue missing");
                String::new()
            });
            OrderVo {
                id: o.id,
                user_id: o.user_id,
                venue_id: o.venue_id,
                venue_name,
                state: o.state,
                order_time: o.order_time,
                start_time: o.start_time,
                hours: o.hours,
                total: o.total,
            }
        })
        .collect();
    Ok(vos)
}

/// The venue called `venue_name` and its orders starting on `date`.
pub async fn venue_orders_for_day(db: &DatabaseConnection, venue_name: &str, date: NaiveDate) -> Result<VenueOrders, ServiceError> {
    let venue = venue_service::find_by_name(db, venue_name)
        .await?
        .ok_or_else(|| ServiceError::not_found("venue"))?;
    let orders = order_service::find_for_day(db, venue.id, date).await?;
    Ok(VenueOrders { venue, orders })
}
