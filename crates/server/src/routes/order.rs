use axum::extract::State;
use axum::response::Response;
use axum::Json;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use serde_json::json;
use service::pagination::{Pagination, ADMIN_PAGE_SIZE, PUBLIC_PAGE_SIZE};
use service::vo::{self, OrderVo, VenueOrders};
use service::{order_service, venue_service};
use tracing::warn;

use models::order;
use crate::errors::JsonApiError;
use crate::extract::{positive_id, CurrentAdmin, CurrentUser, PageQuery, Params};
use crate::state::AppState;
use crate::view::{flag_or_missing, found, view, View};

#[derive(Debug, Deserialize)]
pub struct OrderIdForm {
    #[serde(rename = "orderID")]
    pub order_id: i32,
}

#[derive(Debug, Deserialize)]
pub struct VenueIdQuery {
    #[serde(rename = "venueID")]
    pub venue_id: i32,
}

/// Reservation fields shared by the place and modify forms.
#[derive(Debug, Deserialize)]
pub struct OrderForm {
    #[serde(rename = "orderID", default)]
    pub order_id: Option<i32>,
    #[serde(rename = "venueName")]
    pub venue_name: String,
    /// `yyyy-MM-dd`
    pub date: String,
    /// `HH:mm`
    #[serde(rename = "startTime")]
    pub start_time: String,
    pub hours: i32,
}

impl OrderForm {
    fn start(&self) -> Result<NaiveDateTime, JsonApiError> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| JsonApiError::bad_request("date must be yyyy-MM-dd"))?;
        let time = NaiveTime::parse_from_str(self.start_time.trim(), "%H:%M")
            .map_err(|_| JsonApiError::bad_request("startTime must be HH:mm"))?;
        Ok(date.and_time(time))
    }

    fn hours(&self) -> Result<i32, JsonApiError> {
        if self.hours > 0 {
            Ok(self.hours)
        } else {
            Err(JsonApiError::bad_request("hours must be positive"))
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DayQuery {
    #[serde(rename = "venueName")]
    pub venue_name: String,
    /// `yyyy-MM-dd`
    pub date: String,
}

/// Load an order and make sure it belongs to `user_id`.
async fn owned_order(state: &AppState, id: i32, user_id: &str) -> Result<order::Model, JsonApiError> {
    let o = order_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("order not found"))?;
    if o.user_id != user_id {
        warn!(order_id = id, owner = %o.user_id, %user_id, "order belongs to another user");
        return Err(JsonApiError::forbidden("order belongs to another user"));
    }
    Ok(o)
}

pub async fn order_manage(State(state): State<AppState>, current: CurrentUser) -> Result<Json<View>, JsonApiError> {
    let total = order_service::list_by_user(&state.db, &current.user.user_id, Pagination::first(PUBLIC_PAGE_SIZE))
        .await?
        .total_pages;
    Ok(view("order_manage", json!({ "total": total })))
}

/// Booking form preset to one venue.
pub async fn order_place_for(
    State(state): State<AppState>,
    _current: CurrentUser,
    Params(q): Params<VenueIdQuery>,
) -> Result<Json<View>, JsonApiError> {
    let id = positive_id(q.venue_id, "venueID")?;
    let venue = venue_service::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("venue not found"))?;
    Ok(view("order_place", json!({ "venue": venue })))
}

pub async fn order_place(State(state): State<AppState>, _current: CurrentUser) -> Result<Json<View>, JsonApiError> {
    let venue_list = venue_service::all_venues(&state.db).await?;
    Ok(view("order_place", json!({ "venue_list": venue_list })))
}

#[utoipa::path(
    get, path = "/getOrderList.do", tag = "order",
    params(PageQuery),
    responses((status = 200, description = "Own orders with venue names"), (status = 400, description = "Bad request"), (status = 401, description = "Not signed in"))
)]
pub async fn own_list(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<OrderVo>>, JsonApiError> {
    let page = order_service::list_by_user(&state.db, &current.user.user_id, q.pagination(PUBLIC_PAGE_SIZE)?).await?;
    Ok(Json(vo::order_vos(&state.db, page.content).await?))
}

pub async fn add_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<OrderForm>,
) -> Result<Response, JsonApiError> {
    let start = form.start()?;
    let hours = form.hours()?;
    order_service::submit(&state.db, &current.user.user_id, &form.venue_name, start, hours).await?;
    Ok(found("order_manage"))
}

pub async fn order_edit(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(q): Params<OrderIdForm>,
) -> Result<Json<View>, JsonApiError> {
    let id = positive_id(q.order_id, "orderID")?;
    let order = owned_order(&state, id, &current.user.user_id).await?;
    let venue = venue_service::find_by_id(&state.db, order.venue_id).await?;
    Ok(view("order_edit", json!({ "order": order, "venue": venue })))
}

pub async fn modify_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<OrderForm>,
) -> Result<Response, JsonApiError> {
    let id = form
        .order_id
        .ok_or_else(|| JsonApiError::bad_request("missing field orderID"))
        .and_then(|id| positive_id(id, "orderID"))?;
    let start = form.start()?;
    let hours = form.hours()?;
    owned_order(&state, id, &current.user.user_id).await?;
    order_service::update_order(&state.db, id, &form.venue_name, start, hours, &current.user.user_id).await?;
    Ok(found("order_manage"))
}

pub async fn del_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<OrderIdForm>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.order_id, "orderID")?;
    match owned_order(&state, id, &current.user.user_id).await {
        Err(e) if e.status == axum::http::StatusCode::NOT_FOUND => return Ok(flag_or_missing(false)),
        other => other?,
    };
    Ok(flag_or_missing(order_service::delete_order(&state.db, id).await?))
}

pub async fn finish_order(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<OrderIdForm>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.order_id, "orderID")?;
    match owned_order(&state, id, &current.user.user_id).await {
        Err(e) if e.status == axum::http::StatusCode::NOT_FOUND => return Ok(flag_or_missing(false)),
        other => other?,
    };
    order_service::finish(&state.db, id).await?;
    Ok(flag_or_missing(true))
}

/// A venue and the orders booked on one day, for the availability view.
#[utoipa::path(
    get, path = "/order/getOrderList.do", tag = "order",
    params(DayQuery),
    responses((status = 200, description = "Venue and its orders for the day"), (status = 400, description = "Bad request"), (status = 404, description = "Not found"))
)]
pub async fn day_orders(State(state): State<AppState>, Params(q): Params<DayQuery>) -> Result<Json<VenueOrders>, JsonApiError> {
    let date = NaiveDate::parse_from_str(q.date.trim(), "%Y-%m-%d")
        .map_err(|_| JsonApiError::bad_request("date must be yyyy-MM-dd"))?;
    Ok(Json(vo::venue_orders_for_day(&state.db, &q.venue_name, date).await?))
}

// admin

pub async fn reservation_manage(State(state): State<AppState>, _admin: CurrentAdmin) -> Result<Json<View>, JsonApiError> {
    let audited = order_service::list_audited(&state.db).await?;
    let order_list = vo::order_vos(&state.db, audited).await?;
    let total = order_service::list_pending(&state.db, Pagination::first(ADMIN_PAGE_SIZE)).await?.total_pages;
    Ok(view("admin/reservation_manage", json!({ "order_list": order_list, "total": total })))
}

#[utoipa::path(
    get, path = "/admin/getOrderList.do", tag = "admin",
    params(PageQuery),
    responses((status = 200, description = "Orders waiting for approval"), (status = 400, description = "Bad request"), (status = 401, description = "Not signed in"))
)]
pub async fn pending_list(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(q): Params<PageQuery>,
) -> Result<Json<Vec<OrderVo>>, JsonApiError> {
    let page = order_service::list_pending(&state.db, q.pagination(ADMIN_PAGE_SIZE)?).await?;
    Ok(Json(vo::order_vos(&state.db, page.content).await?))
}

pub async fn pass_order(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<OrderIdForm>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.order_id, "orderID")?;
    match order_service::approve(&state.db, id).await {
        Ok(_) => Ok(flag_or_missing(true)),
        Err(service::errors::ServiceError::NotFound(_)) => Ok(flag_or_missing(false)),
        Err(e) => Err(e.into()),
    }
}

pub async fn reject_order(
    State(state): State<AppState>,
    _admin: CurrentAdmin,
    Params(form): Params<OrderIdForm>,
) -> Result<Response, JsonApiError> {
    let id = positive_id(form.order_id, "orderID")?;
    match order_service::reject(&state.db, id).await {
        Ok(_) => Ok(flag_or_missing(true)),
        Err(service::errors::ServiceError::NotFound(_)) => Ok(flag_or_missing(false)),
        Err(e) => Err(e.into()),
    }
}
