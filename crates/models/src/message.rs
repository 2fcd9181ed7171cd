use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::{self, invalid};
use crate::{time_format, user};

/// Moderation status of a message board entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(rename_all = "snake_case")]
pub enum MessageState {
    #[sea_orm(num_value = 1)]
    Pending,
    #[sea_orm(num_value = 2)]
    Approved,
    #[sea_orm(num_value = 3)]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "message")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[serde(with = "crate::time_format")]
    pub time: DateTime,
    pub state: MessageState,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::UserId)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::User.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_content(content: &str) -> Result<(), errors::ModelError> {
    if content.trim().is_empty() { return Err(invalid("content required")); }
    if content.chars().count() > 2000 { return Err(invalid("content too long (<=2000)")); }
    Ok(())
}

/// Insert a pending message stamped with the current time.
pub async fn create(db: &DatabaseConnection, user_id: &str, content: &str) -> Result<Model, errors::ModelError> {
    validate_content(content)?;
    if user_id.trim().is_empty() { return Err(invalid("userID required")); }
    let am = ActiveModel {
        user_id: Set(user_id.to_string()),
        content: Set(content.to_string()),
        time: Set(time_format::now()),
        state: Set(MessageState::Pending),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
