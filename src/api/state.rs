//! Application state module.
//!
//! Contains the shared handle to the in-memory database.

use crate::models::Db;

/// Shared application state.
///
/// Cloning is cheap: only the `Arc` around the database is cloned.
#[derive(Clone)]
pub struct AppState {
    /// In-memory users and items tables
    pub db: Db,
}

impl AppState {
    /// Creates a new `AppState` instance.
    #[must_use]
    pub const fn new(db: Db) -> Self {
        Self { db }
    }
}
