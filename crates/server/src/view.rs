//! Response shapes shared by the page and action handlers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;

/// A page render: the template name and the model it is filled with.
#[derive(Debug, Serialize)]
pub struct View {
    pub view: &'static str,
    pub model: Value,
}

pub fn view(name: &'static str, model: Value) -> Json<View> {
    Json(View { view: name, model })
}

/// `302 Found` to a relative location.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// `true` with 200, or `false` with 404 when the target did not exist.
pub fn flag_or_missing(ok: bool) -> Response {
    if ok {
        Json(true).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(false)).into_response()
    }
}
