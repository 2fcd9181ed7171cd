//! Request extractors shared by the route modules.

use std::collections::HashMap;
use std::future::Future;

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Query, Request};
use axum::http::{header, request::Parts, Method};
use axum::Form;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use service::auth::SessionUser;
use service::errors::ServiceError;
use service::pagination::Pagination;
use service::session::Session;
use service::user_service;
use tracing::{debug, warn};

use crate::errors::JsonApiError;
use crate::state::AppState;

/// Request parameters read from the urlencoded body of a form post, or from the
/// query string otherwise. Any missing or malformed field rejects with 400.
pub struct Params<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Params<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false);
        if is_form && req.method() != Method::GET && req.method() != Method::HEAD {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| JsonApiError::bad_request(e.body_text()))?;
            Ok(Params(value))
        } else {
            let Query(value) = Query::<T>::try_from_uri(req.uri())
                .map_err(|e| JsonApiError::bad_request(e.body_text()))?;
            Ok(Params(value))
        }
    }
}

/// `?page=N`, 1-based; absent means the first page.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u64>,
}

impl PageQuery {
    pub fn pagination(&self, per_page: u64) -> Result<Pagination, JsonApiError> {
        match self.page {
            None => Ok(Pagination::first(per_page)),
            Some(0) => Err(JsonApiError::bad_request("page must be at least 1")),
            Some(page) => Ok(Pagination::new(page, per_page)),
        }
    }
}

/// Reject ids that can never name a row.
pub fn positive_id(id: i32, field: &str) -> Result<i32, JsonApiError> {
    if id > 0 {
        Ok(id)
    } else {
        Err(JsonApiError::bad_request(format!("{field} must be positive")))
    }
}

/// The session attached to the request cookie, empty when there is none.
#[derive(Debug, Clone, Default)]
pub struct SessionCtx {
    pub id: Option<String>,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionCtx {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(id) = jar.get(&state.cookie_name).map(|c| c.value().to_string()) else {
            return Ok(SessionCtx::default());
        };
        match state.sessions.get(&id).await {
            Some(session) => Ok(SessionCtx { id: Some(id), session }),
            None => {
                debug!(session_id = %id, "unknown or expired session cookie");
                Ok(SessionCtx::default())
            }
        }
    }
}

impl SessionCtx {
    /// Drop the current id from the store so the next [`SessionCtx::commit`] issues a fresh one.
    /// Slots already held move over to the new id.
    pub async fn renew(&mut self, state: &AppState) {
        if let Some(old) = self.id.take() {
            state.sessions.remove(&old).await;
            debug!(session_id = %old, "session id retired");
        }
    }

    /// Store the (modified) session and return the cookie jar to send back.
    ///
    /// An emptied session is dropped from the store and its cookie cleared.
    pub async fn commit(self, state: &AppState) -> CookieJar {
        let jar = CookieJar::new();
        if self.session.is_empty() {
            if let Some(id) = self.id {
                state.sessions.remove(&id).await;
            }
            return jar.remove(Cookie::build((state.cookie_name.to_string(), "")).path("/"));
        }
        let id = match self.id {
            Some(id) => {
                state.sessions.put(&id, self.session).await;
                id
            }
            None => state.sessions.create(self.session).await,
        };
        jar.add(session_cookie(&state.cookie_name, id))
    }
}

fn session_cookie(name: &str, id: String) -> Cookie<'static> {
    Cookie::build((name.to_string(), id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Reload the account behind a session slot. `None` once it was deleted or its admin flag
/// no longer matches the slot; a rename is picked up from the row.
async fn live_account(state: &AppState, slot: &SessionUser, admin: bool) -> Result<Option<SessionUser>, JsonApiError> {
    let account = user_service::find_by_id(&state.db, slot.id).await?;
    match account {
        Some(u) if u.is_admin == admin => Ok(Some(SessionUser::from(&u))),
        _ => {
            warn!(id = slot.id, user_id = %slot.user_id, "session account no longer valid");
            Ok(None)
        }
    }
}

/// A signed-in user. Rejects with 401 when the user slot is empty or its account is gone.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub session_id: String,
    pub user: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = SessionCtx::from_request_parts(parts, state).await?;
        let (Some(session_id), Some(user)) = (ctx.id.clone(), ctx.session.user.clone()) else {
            return Err(JsonApiError::unauthorized("请登录"));
        };
        match live_account(state, &user, false).await? {
            Some(user) => Ok(CurrentUser { session_id, user }),
            None => {
                let mut ctx = ctx;
                ctx.session.user = None;
                ctx.commit(state).await;
                Err(JsonApiError::unauthorized("账号已不存在，请重新登录"))
            }
        }
    }
}

/// A signed-in administrator. Rejects with 401 when the admin slot is empty or its account is gone.
#[derive(Debug, Clone)]
pub struct CurrentAdmin {
    pub session_id: String,
    pub admin: SessionUser,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = JsonApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let ctx = SessionCtx::from_request_parts(parts, state).await?;
        let (Some(session_id), Some(admin)) = (ctx.id.clone(), ctx.session.admin.clone()) else {
            return Err(JsonApiError::unauthorized("请以管理员身份登录"));
        };
        match live_account(state, &admin, true).await? {
            Some(admin) => Ok(CurrentAdmin { session_id, admin }),
            None => {
                let mut ctx = ctx;
                ctx.session.admin = None;
                ctx.commit(state).await;
                Err(JsonApiError::unauthorized("请以管理员身份登录"))
            }
        }
    }
}

/// Text fields of a multipart form plus the optional `picture` file part.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    /// Original file name and content of the `picture` part.
    pub picture: Option<(String, Vec<u8>)>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn required(&self, name: &str) -> Result<&str, JsonApiError> {
        self.text(name)
            .ok_or_else(|| JsonApiError::bad_request(format!("missing field {name}")))
    }

    pub fn required_i32(&self, name: &str) -> Result<i32, JsonApiError> {
        self.required(name)?
            .trim()
            .parse::<i32>()
            .map_err(|_| JsonApiError::bad_request(format!("{name} must be an integer")))
    }

    /// Save the picture part, if any, returning its public path.
    pub async fn save_picture(&self, state: &AppState) -> Result<Option<String>, JsonApiError> {
        match &self.picture {
            Some((name, bytes)) => Ok(state.uploads.save_picture(name, bytes).await?),
            None => Ok(None),
        }
    }

    /// Save the picture and hand its path to `op`. The file is removed again when `op` fails.
    pub async fn with_picture<T, F, Fut>(&self, state: &AppState, op: F) -> Result<T, JsonApiError>
    where
        F: FnOnce(Option<String>) -> Fut,
        Fut: Future<Output = Result<T, ServiceError>>,
    {
        let picture = self.save_picture(state).await?;
        match op(picture.clone()).await {
            Ok(v) => Ok(v),
            Err(e) => {
                if let Some(path) = picture {
                    state.uploads.discard(&path).await;
                }
                Err(e.into())
            }
        }
    }
}

#[async_trait]
impl<S> FromRequest<S> for MultipartForm
where
    S: Send + Sync,
{
    type Rejection = JsonApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| JsonApiError::bad_request(e.body_text()))?;
        let mut form = MultipartForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| JsonApiError::bad_request(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            if name == "picture" {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                form.picture = Some((file_name, bytes.to_vec()));
            } else {
                let value = field.text().await.map_err(|e| JsonApiError::bad_request(e.body_text()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }
}
