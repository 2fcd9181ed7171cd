//! Service layer providing business-oriented operations on top of models.
//! - One module per entity; view-object builders join entities for display.
//! - Sessions, password hashing and upload storage live here, independent of the web framework.

pub mod errors;
pub mod pagination;
pub mod user_service;
pub mod venue_service;
pub mod news_service;
pub mod message_service;
pub mod order_service;
pub mod vo;
pub mod auth;
pub mod session;
pub mod upload;
#[cfg(test)]
pub mod test_support;
