use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::session::SessionStore;
use service::upload::UploadStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: Arc<dyn SessionStore>,
    pub uploads: Arc<UploadStore>,
    /// Name of the cookie carrying the session id.
    pub cookie_name: Arc<str>,
}
