//! HTTP layer of the venue booking site: axum routes over the service crate.

pub mod errors;
pub mod extract;
pub mod openapi;
pub mod routes;
pub mod startup;
pub mod state;
pub mod view;

pub use startup::{build_app, build_state, run, run_with_config};
