use axum::extract::State;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use service::pagination::{Page, Pagination, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE};
use service::venue_service;
use tracing::info;

use models::venue::{self, VenueInput};
use crate::errors::JsonApiError;
use crate::extract::{positive_id, CurrentAdmin, MultipartForm, PageQuery, Params};
use crate::state::AppState;
use crate::view::{flag_or_missing, found, view, View};

#[derive(Debug, Deserialize)]
pub struct VenueIdQuery {
    #[serde(rename = "venueID")]
    pub venue_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct VenueNameForm {
    #[serde(rename = "venueName")]
    pub venue_name: String,
}

fn venue_input(form: &MultipartForm) -> Result<VenueInput, JsonApiError> {
    Ok(VenueInput {
        venue_name: form.required("venueName")?.trim().to_string(),
        description: form.text("description").unwrap_or_default().to_string(),
        price: form.required_i32("price")?,
        address: form.required("address")?.to_string(),
        open_time: form.text("open_time").unwrap_or_default().to_string(),
        close_time: form.text("close_time").unwrap_or_default().to_string(),
    })
}

async fn venue_by_id(state: &AppState, id: i32) -> Result<venue::Model, JsonApiError> {
    let id = positive_id(id, "venueID")?;
    venue_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("venue not found"))
}

pub async fn venue_detail(State(state): State<AppState>, Params(q): Params<VenueIdQuery>) -> Result<Json<View>, JsonApiError> {
    let venue = venue_by_id(&state, q.venue_id).await?;
    Ok(view("venue", json!({ "venue": venue })))
}

pub async fn venue_list_page(State(state): State<AppState>) -> Result<Json<View>, JsonApiError> {
    let page = venue_service::list_venues(&state.db, Pagination::first(PUBLIC_PAGE_SIZE)).await?;
    Ok(view("venue_list", json!({ "venue_list": page.content, "total": page.total_pages })))
}

/// Venues by id, five per page.
#[utoipa::path(
    get, path = "/venuelist/getVenueList", tag = "venue",
    params(PageQuery),
    responses((status = 200, description = "One page of venues"), (status = 400, description = "Bad page"))
)]
pub async fn venue_page(State(state): State<AppState>, Params(q): Params<PageQuery>) -> Result<Json<Page<venue::Model>>, JsonApiError> {
    Ok(Json(venue_service::list_venues(&state.db, q.pagination(PUBLIC_PAGE_SIZE)?).await?))
}

// admin

pub async fn venue_manage(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<Json<View>, JsonApiError> {
    let total = venue_service::list_venues(&state.db, Pagination::first(ADMIN_PAGE_SIZE)).await?.total_pages;
    Ok(view("admin/venue_manage", json!({ "total": total })))
}

pub async fn venue_edit(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<VenueIdQuery>,
) -> Result<Json<View>, JsonApiError> {
    let venue = venue_by_id(&state, q.venue_id).await?;
    Ok(view("admin/venue_edit", json!({ "venue": venue })))
}

pub async fn venue_add(_admin: CurrentAdmin) -> Json<View> {
    view("admin/venue_add", json!({}))
}

#[utoipa::path(
    get, path = "/venueList.do", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "Venues, ten per page"), (status = 400, description = "Bad page"), (status = 401, description = "Not an admin"))
)]
pub async fn admin_venue_list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<venue::Model>>, JsonApiError> {
    let page = venue_service::list_venues(&state.db, q.pagination(ADMIN_PAGE_SIZE)?).await?;
    Ok(Json(page.content))
}

pub async fn add_venue(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    form: MultipartForm,
) -> Result<Response, JsonApiError> {
    let input = venue_input(&form)?;
    let created = form
        .with_picture(&state, |picture| venue_service::create_venue(&state.db, input, picture))
        .await?;
    info!(id = created.id, venue_name = %created.venue_name, "venue added");
    Ok(found("venue_manage"))
}

pub async fn modify_venue(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    form: MultipartForm,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.required_i32("venueID")?, "venueID")?;
    let input = venue_input(&form)?;
    form.with_picture(&state, |picture| venue_service::update_venue(&state.db, id, input, picture))
        .await?;
    Ok(found("venue_manage"))
}

pub async fn del_venue(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<VenueIdQuery>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(q.venue_id, "venueID")?;
    Ok(flag_or_missing(venue_service::delete_venue(&state.db, id).await?))
}

/// `true` when no venue uses the name yet.
#[utoipa::path(
    post, path = "/checkVenueName.do", tag = "admin",
    params(("venueName" = String, Query, description = "Venue name to check")),
    responses((status = 200, description = "Whether the name is free"), (status = 401, description = "Not an admin"))
)]
pub async fn check_venue_name(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<VenueNameForm>,
) -> Result<Json<bool>, JsonApiError> {
    Ok(Json(venue_service::is_venue_name_available(&state.db, &form.venue_name).await?))
}
