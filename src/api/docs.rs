//! OpenAPI document and the interactive documentation pages.

use axum::Router;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;

/// Path of the Swagger UI page.
pub const DOCS_PATH: &str = "/docs";
/// Path of the ReDoc page.
pub const REDOC_PATH: &str = "/redoc";
/// Path of the raw OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "First UV Pro API",
        version = "1.0.0",
        description = "A JSON REST API managing users and items"
    ),
    paths(
        handlers::root_handler,
        handlers::health_handler,
        handlers::create_user_handler,
        handlers::list_users_handler,
        handlers::get_user_handler,
        handlers::update_user_handler,
        handlers::delete_user_handler,
        handlers::search_users_by_email_handler,
        handlers::create_item_handler,
        handlers::list_items_handler,
        handlers::get_item_handler,
        handlers::update_item_handler,
        handlers::delete_item_handler,
        handlers::stats_handler,
        handlers::reset_handler
    ),
    tags(
        (name = "Root"),
        (name = "Health"),
        (name = "Users"),
        (name = "Items"),
        (name = "Statistics"),
        (name = "Utility")
    )
)]
pub struct ApiDoc;

/// Routes serving Swagger UI, ReDoc, and the OpenAPI document they render.
pub fn docs_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .merge(SwaggerUi::new(DOCS_PATH).url(OPENAPI_PATH, ApiDoc::openapi()))
        .merge(Redoc::with_url(REDOC_PATH, ApiDoc::openapi()))
}
