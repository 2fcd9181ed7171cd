use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::{self, invalid};
use crate::order;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "venue")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub venue_name: String,
    pub description: String,
    /// per hour
    pub price: i32,
    pub picture: String,
    pub address: String,
    pub open_time: String,
    pub close_time: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Order,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Order => Entity::has_many(order::Entity).into() }
    }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Order.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Editable venue fields, shared by create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueInput {
    pub venue_name: String,
    pub description: String,
    pub price: i32,
    pub address: String,
    pub open_time: String,
    pub close_time: String,
}

pub fn validate_venue_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(invalid("venueName required")); }
    if name.chars().count() > 128 { return Err(invalid("venueName too long (<=128)")); }
    Ok(())
}

pub fn validate_price(price: i32) -> Result<(), errors::ModelError> {
    if price < 0 { return Err(invalid("price must be >= 0")); }
    Ok(())
}

pub fn validate_input(input: &VenueInput) -> Result<(), errors::ModelError> {
    validate_venue_name(&input.venue_name)?;
    validate_price(input.price)?;
    if input.address.trim().is_empty() { return Err(invalid("address required")); }
    if input.open_time.trim().is_empty() || input.close_time.trim().is_empty() {
        return Err(invalid("open_time and close_time required"));
    }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: VenueInput, picture: String) -> Result<Model, errors::ModelError> {
    validate_input(&input)?;
    let am = ActiveModel {
        venue_name: Set(input.venue_name),
        description: Set(input.description),
        price: Set(input.price),
        picture: Set(picture),
        address: Set(input.address),
        open_time: Set(input.open_time),
        close_time: Set(input.close_time),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::VenueName.eq(name)).one(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> VenueInput {
        VenueInput {
            venue_name: "Court A".into(),
            description: "indoor".into(),
            price: 100,
            address: "1 Gym Road".into(),
            open_time: "08:00".into(),
            close_time: "22:00".into(),
        }
    }

    #[test]
    fn accepts_complete_input() {
        assert!(validate_input(&input()).is_ok());
    }

    #[test]
    fn rejects_negative_price_and_blank_fields() {
        assert!(validate_input(&VenueInput { price: -1, ..input() }).is_err());
        assert!(validate_input(&VenueInput { venue_name: " ".into(), ..input() }).is_err());
        assert!(validate_input(&VenueInput { address: String::new(), ..input() }).is_err());
        assert!(validate_input(&VenueInput { close_time: String::new(), ..input() }).is_err());
    }
}
