use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

use super::domain::{LoginOutcome, SessionUser};
use crate::errors::ServiceError;
use crate::user_service;

/// Authenticate and classify the account.
///
/// Returns `Ok(None)` for an unknown user id or a wrong password.
#[instrument(skip(db, password), fields(user_id = %user_id))]
pub async fn login(db: &DatabaseConnection, user_id: &str, password: &str) -> Result<Option<LoginOutcome>, ServiceError> {
    let Some(user) = user_service::check_login(db, user_id, password).await? else {
        warn!("login_rejected");
        common::metrics::record("login_failed");
        return Ok(None);
    };
    let session_user = SessionUser::from(&user);
    let outcome = if user.is_admin {
        LoginOutcome::Admin(session_user)
    } else {
        LoginOutcome::User(session_user)
    };
    info!(is_admin = user.is_admin, "login_ok");
    common::metrics::record("login_ok");
    Ok(Some(outcome))
}
