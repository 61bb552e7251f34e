//! Request/response schema module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::models::{InventoryStats, ItemChanges, NewItem, NewUser, Page, PriceRange, UserChanges};

/// Distinguishes a field sent as `null` (`Some(None)`) from one left out (`None`).
fn deserialize_present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

const fn default_quantity() -> i64 {
    1
}

#[allow(clippy::cast_possible_wrap)]
const fn default_limit() -> i64 {
    Page::DEFAULT_LIMIT as i64
}

// ============ Users ============

/// User creation request.
///
/// Unknown fields, including a client-supplied `id` or `created_at`, are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    pub age: i64,
}

impl From<CreateUserRequest> for NewUser {
    fn from(req: CreateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

/// Partial user update. Missing or `null` fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    #[serde(default)]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    #[serde(default)]
    pub email: Option<String>,

    #[validate(range(min = 0, max = 150, message = "Age must be between 0 and 150"))]
    #[serde(default)]
    pub age: Option<i64>,
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            age: req.age,
        }
    }
}

/// Query for `GET /users/search/by-email`.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EmailSearchQuery {
    /// Email to search for
    pub email: String,
}

// ============ Items ============

/// Item creation request.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    pub price: f64,

    #[validate(range(min = 0, message = "Quantity must be greater than or equal to 0"))]
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

impl From<CreateItemRequest> for NewItem {
    fn from(req: CreateItemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price: req.price,
            quantity: req.quantity,
        }
    }
}

/// Partial item update.
///
/// `description: null` clears the description; `null` on any other field is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateItemRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(range(exclusive_min = 0.0, message = "Price must be greater than 0"))]
    #[serde(default)]
    pub price: Option<f64>,

    #[validate(range(min = 0, message = "Quantity must be greater than or equal to 0"))]
    #[serde(default)]
    pub quantity: Option<i64>,
}

impl From<UpdateItemRequest> for ItemChanges {
    fn from(req: UpdateItemRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            price: req.price,
            quantity: req.quantity,
        }
    }
}

// ============ Pagination and filters ============

/// `skip`/`limit` query parameters.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Number of records to skip
    #[validate(range(min = 0, message = "skip must be greater than or equal to 0"))]
    #[serde(default)]
    pub skip: i64,

    /// Maximum number of records to return
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: default_limit(),
        }
    }
}

impl PaginationQuery {
    /// Converts validated parameters into a `Page`.
    pub fn page(&self) -> Page {
        Page::new(
            usize::try_from(self.skip).unwrap_or_default(),
            usize::try_from(self.limit).unwrap_or(Page::DEFAULT_LIMIT),
        )
    }
}

/// Query for `GET /items`: pagination plus optional inclusive price bounds.
///
/// `f64` parsing accepts `NaN` and `inf`, which range checks let through,
/// so the bounds are also required to be finite.
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
#[validate(schema(function = "validate_finite_price_bounds"))]
pub struct ItemListQuery {
    /// Number of records to skip
    #[validate(range(min = 0, message = "skip must be greater than or equal to 0"))]
    #[serde(default)]
    pub skip: i64,

    /// Maximum number of records to return
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Minimum price filter
    #[validate(range(min = 0.0, message = "min_price must be greater than or equal to 0"))]
    #[serde(default)]
    pub min_price: Option<f64>,

    /// Maximum price filter
    #[validate(range(min = 0.0, message = "max_price must be greater than or equal to 0"))]
    #[serde(default)]
    pub max_price: Option<f64>,
}

fn validate_finite_price_bounds(query: &ItemListQuery) -> Result<(), ValidationError> {
    let bounds = [("min_price", query.min_price), ("max_price", query.max_price)];
    for (name, bound) in bounds {
        if bound.is_some_and(|value| !value.is_finite()) {
            return Err(ValidationError::new("finite")
                .with_message(format!("{name} must be a finite number").into()));
        }
    }
    Ok(())
}

impl ItemListQuery {
    pub fn page(&self) -> Page {
        PaginationQuery {
            skip: self.skip,
            limit: self.limit,
        }
        .page()
    }

    pub const fn price_range(&self) -> PriceRange {
        PriceRange {
            min: self.min_price,
            max: self.max_price,
        }
    }
}

// ============ Responses ============

/// Response for `GET /`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    #[schema(value_type = String)]
    pub version: &'static str,
    #[schema(value_type = String)]
    pub docs: &'static str,
    #[schema(value_type = String)]
    pub redoc: &'static str,
}

/// Response for `GET /health`.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String)]
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub users_count: usize,
    pub items_count: usize,
}

/// User section of the statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    pub total: usize,
}

/// Item section of the statistics response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemStats {
    pub total: usize,
    pub total_inventory_value: f64,
    pub average_price: f64,
}

impl From<InventoryStats> for ItemStats {
    fn from(stats: InventoryStats) -> Self {
        Self {
            total: stats.total,
            total_inventory_value: stats.total_inventory_value,
            average_price: stats.average_price,
        }
    }
}

/// Response for `GET /stats`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatsResponse {
    pub users: UserStats,
    pub items: ItemStats,
    pub timestamp: DateTime<Utc>,
}

/// Message plus server time, returned by utility endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(value_type = String)]
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// Error body shared by every failing response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}
