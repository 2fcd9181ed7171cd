use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use serde::{Deserialize, Serialize};

use crate::errors::{self, invalid};
use crate::{message, order};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: String,
    pub user_name: String,
    /// argon2 PHC string
    #[serde(default, skip_serializing)]
    pub password: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
    pub picture: String,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Message,
    Order,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Message => Entity::has_many(message::Entity).into(),
            Relation::Order => Entity::has_many(order::Entity).into(),
        }
    }
}

impl Related<message::Entity> for Entity {
    fn to() -> RelationDef { Relation::Message.def() }
}

impl Related<order::Entity> for Entity {
    fn to() -> RelationDef { Relation::Order.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields for a new account; `password_hash` is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub user_name: String,
    pub password_hash: String,
    pub email: String,
    pub phone: String,
    pub is_admin: bool,
}

pub fn validate_user_id(user_id: &str) -> Result<(), errors::ModelError> {
    if user_id.trim().is_empty() { return Err(invalid("userID required")); }
    if user_id.len() > 64 { return Err(invalid("userID too long (<=64)")); }
    if user_id.chars().any(char::is_whitespace) { return Err(invalid("userID must not contain whitespace")); }
    Ok(())
}

pub fn validate_user_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(invalid("userName required")); }
    if name.chars().count() > 128 { return Err(invalid("userName too long (<=128)")); }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), errors::ModelError> {
    if password.is_empty() { return Err(invalid("password required")); }
    if password.len() > 128 { return Err(invalid("password too long (<=128)")); }
    Ok(())
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(l), Some(d), None) => (l, d),
        _ => return Err(invalid("invalid email")),
    };
    let domain_ok = domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) || email.len() > 255 {
        return Err(invalid("invalid email"));
    }
    Ok(())
}

/// Optional leading `+`, then digits and dashes with 6..=20 digits in total.
pub fn validate_phone(phone: &str) -> Result<(), errors::ModelError> {
    let body = phone.strip_prefix('+').unwrap_or(phone);
    let digits = body.chars().filter(char::is_ascii_digit).count();
    let charset_ok = !body.is_empty() && body.chars().all(|c| c.is_ascii_digit() || c == '-');
    if !charset_ok || !(6..=20).contains(&digits) {
        return Err(invalid("invalid phone"));
    }
    Ok(())
}

pub fn validate_new_user(input: &NewUser) -> Result<(), errors::ModelError> {
    validate_user_id(&input.user_id)?;
    validate_user_name(&input.user_name)?;
    validate_email(&input.email)?;
    validate_phone(&input.phone)?;
    Ok(())
}

pub async fn create(db: &DatabaseConnection, input: NewUser) -> Result<Model, errors::ModelError> {
    validate_new_user(&input)?;
    let am = ActiveModel {
        user_id: Set(input.user_id),
        user_name: Set(input.user_name),
        password: Set(input.password_hash),
        email: Set(input.email),
        phone: Set(input.phone),
        is_admin: Set(input.is_admin),
        picture: Set(String::new()),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_user_id(db: &DatabaseConnection, user_id: &str) -> Result<Option<Model>, errors::ModelError> {
    Ok(Entity::find().filter(Column::UserId.eq(user_id)).one(db).await?)
}
