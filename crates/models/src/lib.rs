//! Entities and field validation for the venue booking site.

pub mod errors;
pub mod db;
pub mod time_format;
pub mod user;
pub mod venue;
pub mod news;
pub mod message;
pub mod order;
