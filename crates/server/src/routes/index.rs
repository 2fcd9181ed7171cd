use axum::extract::State;
use axum::Json;
use serde_json::json;
use service::pagination::{Pagination, PUBLIC_PAGE_SIZE};
use service::{message_service, news_service, venue_service, vo};

use crate::errors::JsonApiError;
use crate::extract::{CurrentAdmin, SessionCtx};
use crate::state::AppState;
use crate::view::{view, View};

/// Landing page: first venues, latest news and latest approved messages.
pub async fn index(State(state): State<AppState>, ctx: SessionCtx) -> Result<Json<View>, JsonApiError> {
    let first = Pagination::first(PUBLIC_PAGE_SIZE);
    let venue_list = venue_service::list_venues(&state.db, first).await?.content;
    let news_list = news_service::list_news(&state.db, first).await?.content;
    let approved = message_service::list_approved(&state.db, first).await?;
    let message_list = vo::message_vos(&state.db, approved.content).await?;
    Ok(view("index", json!({
        "user": ctx.session.user,
        "venue_list": venue_list,
        "news_list": news_list,
        "message_list": message_list,
    })))
}

pub async fn admin_index(admin: CurrentAdmin) -> Json<View> {
    view("admin/admin_index", json!({ "admin": admin.admin }))
}
