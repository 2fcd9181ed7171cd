use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use service::auth::{self, LoginOutcome, SessionUser};
use service::user_service::{self, Registration, UserUpdate};
use tracing::{info, warn};

use crate::errors::JsonApiError;
use crate::extract::{CurrentUser, MultipartForm, Params, SessionCtx};
use crate::state::AppState;
use crate::view::{found, view, View};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "userID")]
    pub user_id: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "userName")]
    pub user_name: String,
    pub password: String,
    pub email: String,
    pub phone: String,
}

impl From<RegisterForm> for Registration {
    fn from(f: RegisterForm) -> Self {
        Registration {
            user_id: f.user_id,
            user_name: f.user_name,
            password: f.password,
            email: f.email,
            phone: f.phone,
        }
    }
}

pub async fn signup() -> Json<View> {
    view("signup", json!({}))
}

pub async fn login_page() -> Json<View> {
    view("login", json!({}))
}

/// Check credentials and open the user or admin slot of the session.
///
/// Body is the landing page path on success, `false` otherwise.
#[utoipa::path(
    post, path = "/loginCheck.do", tag = "user",
    request_body(content = crate::openapi::LoginFormDoc, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Landing page path or false"))
)]
pub async fn login_check(
    State(state): State<AppState>,
    mut ctx: SessionCtx,
    Params(form): Params<LoginForm>,
) -> Result<Response, JsonApiError> {
    let Some(outcome) = auth::login(&state.db, &form.user_id, &form.password).await? else {
        return Ok((StatusCode::OK, "false").into_response());
    };
    let landing = outcome.landing_page();
    ctx.renew(&state).await;
    match outcome {
        LoginOutcome::User(u) => ctx.session.user = Some(u),
        LoginOutcome::Admin(a) => ctx.session.admin = Some(a),
    }
    let jar = ctx.commit(&state).await;
    Ok((jar, landing).into_response())
}

pub async fn register(State(state): State<AppState>, Params(form): Params<RegisterForm>) -> Result<Response, JsonApiError> {
    let created = user_service::create_user(&state.db, form.into()).await?;
    info!(user_id = %created.user_id, "register ok");
    Ok(found("login"))
}

pub async fn logout(State(state): State<AppState>, mut ctx: SessionCtx) -> Response {
    ctx.session.user = None;
    let jar = ctx.commit(&state).await;
    (jar, found("/index")).into_response()
}

pub async fn quit(State(state): State<AppState>, mut ctx: SessionCtx) -> Response {
    ctx.session.admin = None;
    let jar = ctx.commit(&state).await;
    (jar, found("/index")).into_response()
}

/// Profile edit from the user info page. The account edited is always the signed-in one.
pub async fn update_user(
    State(state): State<AppState>,
    current: CurrentUser,
    mut ctx: SessionCtx,
    form: MultipartForm,
) -> Result<Response, JsonApiError> {
    let user_id = form.required("userID")?;
    if user_id != current.user.user_id {
        warn!(session_user = %current.user.user_id, %user_id, "profile edit for another account");
        return Err(JsonApiError::forbidden("cannot edit another account"));
    }
    let upd = UserUpdate {
        user_id: user_id.to_string(),
        user_name: form.required("userName")?.to_string(),
        new_password: form.text("passwordNew").map(str::to_string),
        email: form.required("email")?.to_string(),
        phone: form.required("phone")?.to_string(),
        picture: None,
    };
    let updated = form
        .with_picture(&state, |picture| {
            user_service::update_user(&state.db, &current.user.user_id, UserUpdate { picture, ..upd })
        })
        .await?;
    ctx.session.user = Some(SessionUser::from(&updated));
    let jar = ctx.commit(&state).await;
    Ok((jar, found("user_info")).into_response())
}

#[utoipa::path(
    get, path = "/checkPassword.do", tag = "user",
    params(("userID" = String, Query, description = "Login name of the signed-in user"), ("password" = String, Query, description = "Password to check")),
    responses((status = 200, description = "Whether the password matches"), (status = 401, description = "Not signed in"), (status = 403, description = "Not the owner"), (status = 404, description = "Not found"))
)]
pub async fn check_password(
    State(state): State<AppState>,
    current: CurrentUser,
    Params(form): Params<LoginForm>,
) -> Result<Json<bool>, JsonApiError> {
    if form.user_id != current.user.user_id {
        return Err(JsonApiError::forbidden("cannot check another account"));
    }
    let ok = user_service::verify_password(&state.db, &form.user_id, &form.password).await?;
    Ok(Json(ok))
}

pub async fn user_info(State(state): State<AppState>, current: CurrentUser) -> Result<Json<View>, JsonApiError> {
    let user = user_service::find_by_user_id(&state.db, &current.user.user_id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("user not found"))?;
    Ok(view("user_info", json!({ "user": user })))
}
