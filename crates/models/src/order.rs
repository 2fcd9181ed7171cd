use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::{self, invalid};
use crate::{time_format, user, venue};

/// Reservation lifecycle. Transitions are plain writes made by admin or owner actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum OrderState {
    #[sea_orm(num_value = 0)]
    Unsubmitted,
    #[sea_orm(num_value = 1)]
    Pending,
    #[sea_orm(num_value = 2)]
    Approved,
    #[sea_orm(num_value = 3)]
    Finished,
    #[sea_orm(num_value = 4)]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venue_order")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    pub venue_id: i32,
    pub state: OrderState,
    #[serde(with = "crate::time_format")]
    pub order_time: DateTime,
    #[serde(with = "crate::time_format")]
    pub start_time: DateTime,
    pub hours: i32,
    pub total: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Venue,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::UserId)
                .into(),
            Relation::Venue => Entity::belongs_to(venue::Entity)
                .from(Column::VenueId)
                .to(venue::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl Related<venue::Entity> for Entity {
    fn to() -> RelationDef { Relation::Venue.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub const MAX_HOURS: i32 = 24;

pub fn validate_hours(hours: i32) -> Result<(), errors::ModelError> {
    if !(1..=MAX_HOURS).contains(&hours) {
        return Err(invalid(format!("hours must be within 1..={MAX_HOURS}")));
    }
    Ok(())
}

/// `hours × price`, rejecting overflow instead of wrapping.
pub fn compute_total(hours: i32, price: i32) -> Result<i32, errors::ModelError> {
    hours.checked_mul(price).ok_or_else(|| invalid("order total overflows"))
}

/// Insert a pending order priced against `venue`.
pub async fn submit(
    db: &DatabaseConnection,
    user_id: &str,
    venue: &venue::Model,
    start_time: DateTime,
    hours: i32,
) -> Result<Model, errors::ModelError> {
    validate_hours(hours)?;
    if user_id.trim().is_empty() { return Err(invalid("userID required")); }
    let am = ActiveModel {
        user_id: Set(user_id.to_string()),
        venue_id: Set(venue.id),
        state: Set(OrderState::Pending),
        order_time: Set(time_format::now()),
        start_time: Set(start_time),
        hours: Set(hours),
        total: Set(compute_total(hours, venue.price)?),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn hours_bounds() {
        assert!(validate_hours(0).is_err());
        assert!(validate_hours(-3).is_err());
        assert!(validate_hours(1).is_ok());
        assert!(validate_hours(MAX_HOURS).is_ok());
        assert!(validate_hours(MAX_HOURS + 1).is_err());
    }

    #[test]
    fn total_is_hours_times_price() {
        assert_eq!(compute_total(3, 120).unwrap(), 360);
        assert!(compute_total(24, i32::MAX).is_err());
    }

    #[test]
    fn state_numbers_are_stable() {
        assert_eq!(OrderState::Unsubmitted.to_value(), 0);
        assert_eq!(OrderState::Pending.to_value(), 1);
        assert_eq!(OrderState::Approved.to_value(), 2);
        assert_eq!(OrderState::Finished.to_value(), 3);
        assert_eq!(OrderState::Rejected.to_value(), 4);
        assert_eq!(serde_json::to_string(&OrderState::Pending).unwrap(), "\"pending\"");
    }
}
