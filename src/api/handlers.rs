//! HTTP request handler module.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::api::docs::{DOCS_PATH, REDOC_PATH};
use crate::api::extract::{ValidatedJson, ValidatedQuery};
use crate::api::schemas::{
    CreateItemRequest, CreateUserRequest, EmailSearchQuery, ErrorResponse, HealthResponse,
    ItemListQuery, MessageResponse, PaginationQuery, RootResponse, StatsResponse,
    UpdateItemRequest, UpdateUserRequest, UserStats,
};
use crate::api::state::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{Item, ItemRepository, User, UserRepository};

/// Greeting returned by the root endpoint.
pub const WELCOME_MESSAGE: &str = "Hello from first-uv-pro! - from Ramesh Kumar Sah";

// ============ Root & health ============

/// Welcome handler.
///
/// # Route
///
/// `GET /`
#[utoipa::path(
    get,
    path = "/",
    tag = "Root",
    responses((status = 200, description = "Welcome message", body = RootResponse))
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: WELCOME_MESSAGE,
        version: env!("CARGO_PKG_VERSION"),
        docs: DOCS_PATH,
        redoc: REDOC_PATH,
    })
}

/// Health check handler.
///
/// Reports liveness together with the current record counts.
///
/// # Route
///
/// `GET /health`
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = state.db.counts().await;
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now(),
        users_count: counts.users,
        items_count: counts.items,
    })
}

/// Fallback for unmatched routes.
pub async fn not_found_handler() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

// ============ Users ============

/// User creation handler.
///
/// # Route
///
/// `POST /users`
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    ValidatedJson(req_body): ValidatedJson<CreateUserRequest>,
) -> (StatusCode, Json<User>) {
    let user = UserRepository::create(&state.db, req_body.into()).await;
    (StatusCode::CREATED, Json(user))
}

/// Paginated user listing in creation order.
///
/// # Route
///
/// `GET /users?skip=&limit=`
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Users in creation order", body = Vec<User>),
        (status = 422, description = "Invalid paging parameters", body = ErrorResponse)
    )
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PaginationQuery>,
) -> Json<Vec<User>> {
    Json(UserRepository::list(&state.db, query.page()).await)
}

/// # Route
///
/// `GET /users/{user_id}`
#[utoipa::path(
    get,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "The ID of the user to retrieve")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<User>> {
    UserRepository::find_by_id(&state.db, &user_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::user_not_found(&user_id))
}

/// Partial user update.
///
/// # Route
///
/// `PUT /users/{user_id}`
#[utoipa::path(
    put,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "The ID of the user to update")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ValidatedJson(req_body): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    UserRepository::update(&state.db, &user_id, req_body.into())
        .await
        .map(Json)
        .ok_or_else(|| AppError::user_not_found(&user_id))
}

/// # Route
///
/// `DELETE /users/{user_id}`
#[utoipa::path(
    delete,
    path = "/users/{user_id}",
    tag = "Users",
    params(("user_id" = String, Path, description = "The ID of the user to delete")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<StatusCode> {
    if UserRepository::delete(&state.db, &user_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::user_not_found(&user_id))
    }
}

/// Case-insensitive substring search over user emails.
///
/// # Route
///
/// `GET /users/search/by-email?email=`
#[utoipa::path(
    get,
    path = "/users/search/by-email",
    tag = "Users",
    params(EmailSearchQuery),
    responses(
        (status = 200, description = "Matching users", body = Vec<User>),
        (status = 422, description = "Missing email", body = ErrorResponse)
    )
)]
pub async fn search_users_by_email_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<EmailSearchQuery>,
) -> Json<Vec<User>> {
    Json(UserRepository::search_by_email(&state.db, &query.email).await)
}

// ============ Items ============

/// Item creation handler.
///
/// # Route
///
/// `POST /items`
#[utoipa::path(
    post,
    path = "/items",
    tag = "Items",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_item_handler(
    State(state): State<AppState>,
    ValidatedJson(req_body): ValidatedJson<CreateItemRequest>,
) -> (StatusCode, Json<Item>) {
    let item = ItemRepository::create(&state.db, req_body.into()).await;
    (StatusCode::CREATED, Json(item))
}

/// Item listing. Price bounds are applied before pagination.
///
/// # Route
///
/// `GET /items?skip=&limit=&min_price=&max_price=`
#[utoipa::path(
    get,
    path = "/items",
    tag = "Items",
    params(ItemListQuery),
    responses(
        (status = 200, description = "Items in creation order", body = Vec<Item>),
        (status = 422, description = "Invalid paging or price parameters", body = ErrorResponse)
    )
)]
pub async fn list_items_handler(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ItemListQuery>,
) -> Json<Vec<Item>> {
    Json(ItemRepository::list(&state.db, query.price_range(), query.page()).await)
}

/// # Route
///
/// `GET /items/{item_id}`
#[utoipa::path(
    get,
    path = "/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "The ID of the item to retrieve")),
    responses(
        (status = 200, description = "Item found", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<Json<Item>> {
    ItemRepository::find_by_id(&state.db, &item_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::item_not_found(&item_id))
}

/// # Route
///
/// `PUT /items/{item_id}`
#[utoipa::path(
    put,
    path = "/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "The ID of the item to update")),
    request_body = UpdateItemRequest,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn update_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
    ValidatedJson(req_body): ValidatedJson<UpdateItemRequest>,
) -> AppResult<Json<Item>> {
    ItemRepository::update(&state.db, &item_id, req_body.into())
        .await
        .map(Json)
        .ok_or_else(|| AppError::item_not_found(&item_id))
}

/// # Route
///
/// `DELETE /items/{item_id}`
#[utoipa::path(
    delete,
    path = "/items/{item_id}",
    tag = "Items",
    params(("item_id" = String, Path, description = "The ID of the item to delete")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn delete_item_handler(
    State(state): State<AppState>,
    Path(item_id): Path<String>,
) -> AppResult<StatusCode> {
    if ItemRepository::delete(&state.db, &item_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::item_not_found(&item_id))
    }
}

// ============ Statistics & utility ============

/// Aggregate statistics over users and items.
///
/// # Route
///
/// `GET /stats`
#[utoipa::path(
    get,
    path = "/stats",
    tag = "Statistics",
    responses((status = 200, description = "Aggregate statistics", body = StatsResponse))
)]
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.db.stats().await;

    Json(StatsResponse {
        users: UserStats {
            total: snapshot.users,
        },
        items: snapshot.inventory.into(),
        timestamp: Utc::now(),
    })
}

/// Clears every user and item.
///
/// # Route
///
/// `POST /reset`
#[utoipa::path(
    post,
    path = "/reset",
    tag = "Utility",
    responses((status = 200, description = "Both collections cleared", body = MessageResponse))
)]
pub async fn reset_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    let cleared = state.db.reset().await;
    tracing::warn!(
        users = cleared.users,
        items = cleared.items,
        "Database reset"
    );

    Json(MessageResponse {
        message: "Database reset successfully",
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::init_db;

    fn test_state() -> AppState {
        AppState::new(init_db())
    }

    fn user_body(name: &str, email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: name.to_string(),
            email: email.to_string(),
            age: 30,
        }
    }

    fn item_body(title: &str, price: f64, quantity: i64) -> CreateItemRequest {
        CreateItemRequest {
            title: title.to_string(),
            description: None,
            price,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_root_handler() {
        let Json(body) = root_handler().await;
        assert_eq!(body.message, WELCOME_MESSAGE);
        assert_eq!(body.version, "1.0.0");
        assert_eq!(body.docs, "/docs");
        assert_eq!(body.redoc, "/redoc");
    }

    #[tokio::test]
    async fn test_health_handler_counts() {
        let state = test_state();
        create_user_handler(
            State(state.clone()),
            ValidatedJson(user_body("a", "a@example.com")),
        )
        .await;

        let Json(health) = health_handler(State(state)).await;
        assert_eq!(health.status, "healthy");
        assert_eq!(health.users_count, 1);
        assert_eq!(health.items_count, 0);
    }

    #[tokio::test]
    async fn test_create_user_returns_created() {
        let state = test_state();
        let (status, Json(user)) = create_user_handler(
            State(state),
            ValidatedJson(user_body("Ramesh", "ramesh@example.com")),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(user.email, "ramesh@example.com");
        assert!(!user.id.is_empty());
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let state = test_state();
        let err = get_user_handler(State(state), Path("ghost".to_string()))
            .await
            .unwrap_err();

        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "User with ID ghost not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_user_round_trip() {
        let state = test_state();
        let (_, Json(user)) = create_user_handler(
            State(state.clone()),
            ValidatedJson(user_body("Old", "old@example.com")),
        )
        .await;

        let update = UpdateUserRequest {
            name: Some("New".to_string()),
            ..UpdateUserRequest::default()
        };
        let Json(updated) = update_user_handler(
            State(state.clone()),
            Path(user.id.clone()),
            ValidatedJson(update),
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "New");
        assert_eq!(updated.email, "old@example.com");

        let Json(fetched) = get_user_handler(State(state), Path(user.id)).await.unwrap();
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn test_delete_user_then_missing() {
        let state = test_state();
        let (_, Json(user)) = create_user_handler(
            State(state.clone()),
            ValidatedJson(user_body("x", "x@example.com")),
        )
        .await;

        let status = delete_user_handler(State(state.clone()), Path(user.id.clone()))
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);

        let err = delete_user_handler(State(state), Path(user.id))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_item_not_found_message() {
        let state = test_state();
        let err = update_item_handler(
            State(state),
            Path("missing".to_string()),
            ValidatedJson(UpdateItemRequest::default()),
        )
        .await
        .unwrap_err();

        match err {
            AppError::NotFound(msg) => assert_eq!(msg, "Item with ID missing not found"),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = test_state();
        create_item_handler(State(state.clone()), ValidatedJson(item_body("a", 10.0, 2))).await;
        create_item_handler(State(state.clone()), ValidatedJson(item_body("b", 20.0, 1))).await;
        create_user_handler(
            State(state.clone()),
            ValidatedJson(user_body("u", "u@example.com")),
        )
        .await;

        let Json(stats) = stats_handler(State(state)).await;
        assert_eq!(stats.users.total, 1);
        assert_eq!(stats.items.total, 2);
        assert!((stats.items.total_inventory_value - 40.0).abs() < f64::EPSILON);
        assert!((stats.items.average_price - 15.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_reset_handler_clears_all() {
        let state = test_state();
        create_item_handler(State(state.clone()), ValidatedJson(item_body("a", 1.0, 1))).await;
        create_user_handler(
            State(state.clone()),
            ValidatedJson(user_body("u", "u@example.com")),
        )
        .await;

        let Json(body) = reset_handler(State(state.clone())).await;
        assert_eq!(body.message, "Database reset successfully");

        let counts = state.db.counts().await;
        assert_eq!((counts.users, counts.items), (0, 0));
    }
}
