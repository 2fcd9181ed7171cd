use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use service::news_service;
use service::pagination::{Page, Pagination, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE};

use models::news;
use crate::errors::JsonApiError;
use crate::extract::{positive_id, CurrentAdmin, PageQuery, Params};
use crate::state::AppState;
use crate::view::{flag_or_missing, found, view, View};

#[derive(Debug, Deserialize)]
pub struct NewsIdQuery {
    #[serde(rename = "newsID")]
    pub news_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct NewsForm {
    #[serde(rename = "newsID", default)]
    pub news_id: Option<i32>,
    pub title: String,
    pub content: String,
}

async fn news_by_id(state: &AppState, id: i32) -> Result<news::Model, JsonApiError> {
    let id = positive_id(id, "newsID")?;
    news_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("news not found"))
}

pub async fn news_detail(State(state): State<AppState>, Params(q): Params<NewsIdQuery>) -> Result<Json<View>, JsonApiError> {
    let news = news_by_id(&state, q.news_id).await?;
    Ok(view("news", json!({ "news": news })))
}

pub async fn news_list_page(State(state): State<AppState>) -> Result<Json<View>, JsonApiError> {
    let page = news_service::list_news(&state.db, Pagination::first(PUBLIC_PAGE_SIZE)).await?;
    Ok(view("news_list", json!({ "news_list": page.content, "total": page.total_pages })))
}

/// Newest news first, five per page.
#[utoipa::path(
    get, path = "/news/getNewsList", tag = "news",
    params(PageQuery),
    responses((status = 200, description = "One page of news"), (status = 400, description = "Bad page"))
)]
pub async fn news_page(State(state): State<AppState>, Params(q): Params<PageQuery>) -> Result<Json<Page<news::Model>>, JsonApiError> {
    Ok(Json(news_service::list_news(&state.db, q.pagination(PUBLIC_PAGE_SIZE)?).await?))
}

// admin

pub async fn news_manage(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<Json<View>, JsonApiError> {
    let total = news_service::list_news(&state.db, Pagination::first(ADMIN_PAGE_SIZE)).await?.total_pages;
    Ok(view("admin/news_manage", json!({ "total": total })))
}

pub async fn news_add(_admin: CurrentAdmin) -> Json<View> {
    view("admin/news_add", json!({}))
}

pub async fn news_edit(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<NewsIdQuery>,
) -> Result<Json<View>, JsonApiError> {
    let news = news_by_id(&state, q.news_id).await?;
    Ok(view("admin/news_edit", json!({ "news": news })))
}

#[utoipa::path(
    get, path = "/newsList.do", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "News, ten per page"), (status = 400, description = "Bad page"), (status = 401, description = "Not an admin"))
)]
pub async fn admin_news_list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<news::Model>>, JsonApiError> {
    Ok(Json(news_service::list_news(&state.db, q.pagination(ADMIN_PAGE_SIZE)?).await?.content))
}

pub async fn del_news(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<NewsIdQuery>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(q.news_id, "newsID")?;
    Ok(flag_or_missing(news_service::delete_news(&state.db, id).await?))
}

pub async fn modify_news(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<NewsForm>,
) -> Result<Response, JsonApiError> {
    let id = form
        .news_id
        .ok_or_else(|| JsonApiError::bad_request("missing field newsID"))
        .and_then(|id| positive_id(id, "newsID"))?;
    news_service::update_news(&state.db, id, &form.title, &form.content).await?;
    Ok(found("news_manage"))
}

pub async fn add_news(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<NewsForm>,
) -> Result<Response, JsonApiError> {
    news_service::create_news(&state.db, &form.title, &form.content).await?;
    Ok(found("news_manage"))
}
