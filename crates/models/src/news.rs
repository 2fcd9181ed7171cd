use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::{self, invalid};
use crate::time_format;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "news")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[serde(with = "crate::time_format")]
    pub time: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { match *self {} }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate(title: &str, content: &str) -> Result<(), errors::ModelError> {
    if title.trim().is_empty() { return Err(invalid("title required")); }
    if title.chars().count() > 255 { return Err(invalid("title too long (<=255)")); }
    if content.trim().is_empty() { return Err(invalid("content required")); }
    Ok(())
}

pub async fn create(db: &DatabaseConnection, title: &str, content: &str) -> Result<Model, errors::ModelError> {
    validate(title, content)?;
    let am = ActiveModel {
        title: Set(title.to_string()),
        content: Set(content.to_string()),
        time: Set(time_format::now()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}
