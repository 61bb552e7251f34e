//! API module.
//!
//! Contains HTTP handlers, routes, schemas, validated extractors, and the OpenAPI document.

pub mod docs;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod schemas;
pub mod state;

pub use routes::{create_routes, request_trace_layer};
pub use state::AppState;
