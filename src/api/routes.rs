//! Route configuration module.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::api::docs::docs_routes;
use crate::api::handlers::{
    create_item_handler, create_user_handler, delete_item_handler, delete_user_handler,
    get_item_handler, get_user_handler, health_handler, list_items_handler, list_users_handler,
    not_found_handler, reset_handler, root_handler, search_users_by_email_handler, stats_handler,
    update_item_handler, update_user_handler,
};
use crate::api::state::AppState;

/// Creates and configures all application routes.
///
/// # Routes
///
/// ## Root & health
/// - `GET /` - Welcome message
/// - `GET /health` - Liveness probe with record counts
///
/// ## Users
/// - `POST /users`, `GET /users`
/// - `GET /users/search/by-email`
/// - `GET|PUT|DELETE /users/{user_id}`
///
/// ## Items
/// - `POST /items`, `GET /items`
/// - `GET|PUT|DELETE /items/{item_id}`
///
/// ## Statistics & utility
/// - `GET /stats`
/// - `POST /reset`
///
/// ## Documentation
/// - `GET /docs` - Swagger UI
/// - `GET /redoc` - ReDoc
/// - `GET /openapi.json` - OpenAPI document
///
/// Any other path answers `404 {"detail": "Not Found"}`.
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        // Root & health
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        // Users
        .route("/users", post(create_user_handler).get(list_users_handler))
        .route("/users/search/by-email", get(search_users_by_email_handler))
        .route(
            "/users/{user_id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        // Items
        .route("/items", post(create_item_handler).get(list_items_handler))
        .route(
            "/items/{item_id}",
            get(get_item_handler)
                .put(update_item_handler)
                .delete(delete_item_handler),
        )
        // Statistics & utility
        .route("/stats", get(stats_handler))
        .route("/reset", post(reset_handler))
        // Documentation
        .merge(docs_routes())
        .fallback(not_found_handler)
        // Shared state
        .with_state(state)
}

/// Request tracing at `INFO`, so every request is logged under the default `LOG_LEVEL`.
pub fn request_trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO))
}
