//! Auth module: password hashing, login decision and the session-facing user view.

pub mod domain;
pub mod password;
pub mod service;

pub use domain::{LoginOutcome, SessionUser};
pub use service::login;
