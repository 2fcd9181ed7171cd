use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};

use models::user;
use crate::auth::password::{hash_password, verify_password as verify_hash};
use crate::errors::ServiceError;
use crate::pagination::{fetch_page, Page, Pagination};

/// Sign-up form fields with the password in plain text.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user_id: String,
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

/// Profile edit. `new_password` and `picture` keep the stored value when `None`.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub user_id: String,
    pub user_name: String,
    pub new_password: Option<String>,
    pub email: String,
    pub phone: String,
    pub picture: Option<String>,
}

/// Get a user by login name.
pub async fn find_by_user_id(db: &DatabaseConnection, user_id: &str) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::find_by_user_id(db, user_id).await?)
}

/// Get a user by numeric id.
pub async fn find_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<user::Model>, ServiceError> {
    Ok(user::Entity::find_by_id(id).one(db).await?)
}

/// Non-admin accounts, id ascending.
pub async fn list_users(db: &DatabaseConnection, opts: Pagination) -> Result<Page<user::Model>, ServiceError> {
    let select = user::Entity::find()
        .filter(user::Column::IsAdmin.eq(false))
        .order_by_asc(user::Column::Id);
    fetch_page(db, select, opts).await
}

pub async fn count_user_id(db: &DatabaseConnection, user_id: &str) -> Result<u64, ServiceError> {
    let n = user::Entity::find()
        .filter(user::Column::UserId.eq(user_id))
        .count(db)
        .await?;
    Ok(n)
}

pub async fn is_user_id_available(db: &DatabaseConnection, user_id: &str) -> Result<bool, ServiceError> {
    Ok(count_user_id(db, user_id).await? == 0)
}

/// Look up `user_id` and check `password`; `None` on either mismatch.
pub async fn check_login(db: &DatabaseConnection, user_id: &str, password: &str) -> Result<Option<user::Model>, ServiceError> {
    let found = find_by_user_id(db, user_id).await?;
    Ok(found.filter(|u| verify_hash(password, &u.password)))
}

/// Check a password for an existing account.
pub async fn verify_password(db: &DatabaseConnection, user_id: &str, password: &str) -> Result<bool, ServiceError> {
    let u = find_by_user_id(db, user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    Ok(verify_hash(password, &u.password))
}

/// Register a regular account.
#[instrument(skip(db, reg), fields(user_id = %reg.user_id))]
pub async fn create_user(db: &DatabaseConnection, reg: Registration) -> Result<user::Model, ServiceError> {
    insert_account(db, reg, false).await
}

async fn insert_account(db: &DatabaseConnection, reg: Registration, is_admin: bool) -> Result<user::Model, ServiceError> {
    user::validate_password(&reg.password)?;
    let new_user = user::NewUser {
        user_id: reg.user_id,
        user_name: reg.user_name,
        password_hash: String::new(),
        email: reg.email,
        phone: reg.phone,
        is_admin,
    };
    user::validate_new_user(&new_user)?;
    if !is_user_id_available(db, &new_user.user_id).await? {
        return Err(ServiceError::Conflict(format!("userID {} already exists", new_user.user_id)));
    }
    let new_user = user::NewUser { password_hash: hash_password(&reg.password)?, ..new_user };
    let created = user::create(db, new_user).await?;
    info!(id = created.id, user_id = %created.user_id, is_admin, "user_registered");
    common::metrics::record("user_registered");
    Ok(created)
}

/// Apply a profile edit to the account currently named `old_user_id`.
#[instrument(skip(db, upd), fields(old_user_id = %old_user_id, user_id = %upd.user_id))]
pub async fn update_user(db: &DatabaseConnection, old_user_id: &str, upd: UserUpdate) -> Result<user::Model, ServiceError> {
    user::validate_user_id(&upd.user_id)?;
    user::validate_user_name(&upd.user_name)?;
    user::validate_email(&upd.email)?;
    user::validate_phone(&upd.phone)?;

    let existing = find_by_user_id(db, old_user_id).await?.ok_or_else(|| ServiceError::not_found("user"))?;
    if upd.user_id != existing.user_id && !is_user_id_available(db, &upd.user_id).await? {
        return Err(ServiceError::Conflict(format!("userID {} already exists", upd.user_id)));
    }

    let mut am: user::ActiveModel = existing.into();
    am.user_id = Set(upd.user_id);
    am.user_name = Set(upd.user_name);
    am.email = Set(upd.email);
    am.phone = Set(upd.phone);
    if let Some(pw) = upd.new_password.filter(|p| !p.is_empty()) {
        user::validate_password(&pw)?;
        am.password = Set(hash_password(&pw)?);
    }
    if let Some(picture) = upd.picture {
        am.picture = Set(picture);
    }
    let updated = am.update(db).await?;
    info!(id = updated.id, "user_updated");
    Ok(updated)
}

/// Hard delete; `false` when no row matched.
pub async fn delete_user(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = user::Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Create the admin account unless `user_id` already exists. Returns whether it was created.
#[instrument(skip(db, password))]
pub async fn ensure_admin(db: &DatabaseConnection, user_id: &str, user_name: &str, password: &str) -> Result<bool, ServiceError> {
    if let Some(existing) = find_by_user_id(db, user_id).await? {
        if !existing.is_admin {
            tracing::warn!(user_id, "bootstrap admin id is taken by a regular account");
        }
        return Ok(false);
    }
    let reg = Registration {
        user_id: user_id.to_string(),
        user_name: user_name.to_string(),
        password: password.to_string(),
        email: "admin@localhost.local".into(),
        phone: "00000000".into(),
    };
    insert_account(db, reg, true).await?;
    Ok(true)
}
