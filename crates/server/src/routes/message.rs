use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use service::message_service;
use service::pagination::{Pagination, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE};
use service::vo::{self, MessageVo};
use tracing::warn;

use crate::errors::JsonApiError;
use crate::extract::{positive_id, CurrentAdmin, CurrentUser, PageQuery, Params, SessionCtx};
use crate::state::AppState;
use crate::view::{flag_or_missing, found, view, View};

#[derive(Debug, Deserialize)]
pub struct MessageIdForm {
    #[serde(rename = "messageID")]
    pub message_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct ModifyMessageForm {
    #[serde(rename = "messageID")]
    pub message_id: i32,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct SendMessageForm {
    pub content: String,
}

pub async fn message_list_page(State(state): State<AppState>, current: CurrentUser) -> Result<Json<View>, JsonApiError> {
    let first = Pagination::first(PUBLIC_PAGE_SIZE);
    let total = message_service::list_approved(&state.db, first).await?.total_pages;
    let user_total = message_service::list_by_user(&state.db, &current.user.user_id, first).await?.total_pages;
    Ok(view("message_list", json!({ "total": total, "user_total": user_total })))
}

/// Approved messages, newest first.
#[utoipa::path(
    get, path = "/message/getMessageList", tag = "message",
    params(PageQuery),
    responses((status = 200, description = "Approved messages with author details"), (status = 400, description = "Bad request"))
)]
pub async fn approved_list(
    State(state): State<AppState>,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<MessageVo>>, JsonApiError> {
    let page = message_service::list_approved(&state.db, q.pagination(PUBLIC_PAGE_SIZE)?).await?;
    Ok(Json(vo::message_vos(&state.db, page.content).await?))
}

/// The signed-in user's own messages in any state.
#[utoipa::path(
    get, path = "/message/findUserList", tag = "message",
    params(PageQuery),
    responses((status = 200, description = "Own messages"), (status = 400, description = "Bad request"), (status = 401, description = "Not signed in"))
)]
pub async fn own_list(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<MessageVo>>, JsonApiError> {
    let page = message_service::list_by_user(&state.db, &current.user.user_id, q.pagination(PUBLIC_PAGE_SIZE)?).await?;
    Ok(Json(vo::message_vos(&state.db, page.content).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<SendMessageForm>,
) -> Result<Response, JsonApiError> {
    message_service::create_message(&state.db, &current.user.user_id, &form.content).await?;
    Ok(found("/message_list"))
}

/// Load a message and make sure it belongs to `user_id`.
async fn owned_message(state: &AppState, id: i32, user_id: &str) -> Result<(), JsonApiError> {
    let msg = message_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("message not found"))?;
    if msg.user_id != user_id {
        warn!(message_id = id, owner = %msg.user_id, %user_id, "message belongs to another user");
        return Err(JsonApiError::forbidden("message belongs to another user"));
    }
    Ok(())
}

pub async fn modify_message(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<ModifyMessageForm>,
) -> Result<Json<bool>, JsonApiError> {
    let id = positive_id(form.message_id, "messageID")?;
    owned_message(&state, id, &current.user.user_id).await?;
    message_service::update_message(&state.db, id, &form.content).await?;
    Ok(Json(true))
}

/// Delete a message. Admins may delete any message, users only their own.
pub async fn del_message(
    State(state): State<AppState>,
    ctx: SessionCtx,
    Params(form): Params<MessageIdForm>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.message_id, "messageID")?;
    if ctx.session.admin.is_none() {
        let user = ctx.session.user.ok_or_else(|| JsonApiError::unauthorized("请登录"))?;
        match owned_message(&state, id, &user.user_id).await {
            Err(e) if e.status == axum::http::StatusCode::NOT_FOUND => return Ok(flag_or_missing(false)),
            other => other?,
        }
    }
    let deleted = message_service::delete_message(&state.db, id).await?;
    Ok(flag_or_missing(deleted))
}

// admin

pub async fn message_manage(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<Json<View>, JsonApiError> {
    let total = message_service::list_pending(&state.db, Pagination::first(ADMIN_PAGE_SIZE)).await?.total_pages;
    Ok(view("admin/message_manage", json!({ "total": total })))
}

/// Messages waiting for moderation.
#[utoipa::path(
    get, path = "/messageList.do", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "Pending messages"), (status = 400, description = "Bad request"), (status = 401, description = "Not signed in"))
)]
pub async fn pending_list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<MessageVo>>, JsonApiError> {
    let page = message_service::list_pending(&state.db, q.pagination(ADMIN_PAGE_SIZE)?).await?;
    Ok(Json(vo::message_vos(&state.db, page.content).await?))
}

pub async fn pass_message(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<MessageIdForm>,
) -> Result<Json<bool>, JsonApiError> {
    message_service::approve(&state.db, positive_id(form.message_id, "messageID")?).await?;
    Ok(Json(true))
}

pub async fn reject_message(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<MessageIdForm>,
) -> Result<Json<bool>, JsonApiError> {
    message_service::reject(&state.db, positive_id(form.message_id, "messageID")?).await?;
    Ok(Json(true))
}
