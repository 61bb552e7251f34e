//! Database setup module.

use std::sync::Arc;

use crate::models::{Database, Db};

/// Creates the in-memory database shared by all handlers.
pub fn init_db() -> Db {
    let db = Arc::new(Database::new());
    tracing::info!("In-memory database initialized");
    db
}

/// Logs what is discarded when the process stops. Data is not persisted.
pub async fn close_db(db: &Db) {
    let counts = db.counts().await;
    tracing::info!(
        users = counts.users,
        items = counts.items,
        "In-memory database closed, records discarded"
    );
}
