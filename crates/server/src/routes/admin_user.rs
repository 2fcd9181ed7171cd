use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use service::pagination::{Pagination, ADMIN_PAGE_SIZE};
use service::user_service::{self, UserUpdate};

use models::user;
use crate::errors::JsonApiError;
use crate::extract::{positive_id, CurrentAdmin, PageQuery, Params};
use crate::routes::user::RegisterForm;
use crate::state::AppState;
use crate::view::{flag_or_missing, found, view, View};

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ModifyUserForm {
    #[serde(rename = "oldUserID")]
    pub old_user_id: String,
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    /// Empty keeps the current password.
    #[serde(default)]
    pub password: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct UserIdForm {
    #[serde(rename = "userID")]
    pub user_id: String,
}

pub async fn user_manage(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<Json<View>, JsonApiError> {
    let total = user_service::list_users(&state.db, Pagination::first(ADMIN_PAGE_SIZE)).await?.total_pages;
    Ok(view("admin/user_manage", json!({ "total": total })))
}

/// Regular accounts, ten per page.
#[utoipa::path(
    get, path = "/userList.do", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "Regular accounts"), (status = 400, description = "Bad page"), (status = 401, description = "Not an admin"))
)]
pub async fn user_list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<user::Model>>, JsonApiError> {
    Ok(Json(user_service::list_users(&state.db, q.pagination(ADMIN_PAGE_SIZE)?).await?.content))
}

pub async fn user_add(_admin: CurrentAdmin) -> Json<View> {
    view("admin/user_add", json!({}))
}

pub async fn add_user(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<RegisterForm>,
) -> Result<Response, JsonApiError> {
    user_service::create_user(&state.db, form.into()).await?;
    Ok(found("user_manage"))
}

pub async fn user_edit(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<UserIdQuery>,
) -> Result<Json<View>, JsonApiError> {
    let id = positive_id(q.id, "id")?;
    let user = user_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("user not found"))?;
    Ok(view("admin/user_edit", json!({ "user": user })))
}

pub async fn modify_user(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<ModifyUserForm>,
) -> Result<Response, JsonApiError> {
    let upd = UserUpdate {
        user_id: form.user_id,
        user_name: form.user_name,
        new_password: Some(form.password),
        email: form.email,
        phone: form.phone,
        picture: None,
    };
    user_service::update_user(&state.db, &form.old_user_id, upd).await?;
    Ok(found("user_manage"))
}

pub async fn del_user(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<UserIdQuery>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(q.id, "id")?;
    Ok(flag_or_missing(user_service::delete_user(&state.db, id).await?))
}

/// `true` when the user id is not taken.
#[utoipa::path(
    post, path = "/checkUserID.do", tag = "admin",
    params(("userID" = String, Query, description = "Login name to check")),
    responses((status = 200, description = "Whether the id is free"), (status = 401, description = "Not an admin"))
)]
pub async fn check_user_id(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<UserIdForm>,
) -> Result<Json<bool>, JsonApiError> {
    Ok(Json(user_service::is_user_id_available(&state.db, &form.user_id).await?))
}
