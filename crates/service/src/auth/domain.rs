use serde::{Deserialize, Serialize};

use models::user;

/// The part of a user record kept in a login session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i32,
    pub user_id: String,
    pub user_name: String,
    pub picture: String,
    pub is_admin: bool,
}

impl From<&user::Model> for SessionUser {
    fn from(u: &user::Model) -> Self {
        Self {
            id: u.id,
            user_id: u.user_id.clone(),
            user_name: u.user_name.clone(),
            picture: u.picture.clone(),
            is_admin: u.is_admin,
        }
    }
}

/// Successful login, split by the account's role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    User(SessionUser),
    Admin(SessionUser),
}

impl LoginOutcome {
    /// Landing page for the role.
    pub fn landing_page(&self) -> &'static str {
        match self {
            LoginOutcome::User(_) => "/index",
            LoginOutcome::Admin(_) => "/admin_index",
        }
    }
}
