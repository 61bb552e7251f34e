//! In-memory database holding the users and items tables.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::item::{InventoryStats, Item};
use crate::models::table::Table;
use crate::models::user::User;

/// Shared handle to the in-memory database.
pub type Db = Arc<Database>;

/// Both tables behind their own lock.
///
/// Anything that locks both tables takes `users` first, then `items`.
#[derive(Debug, Default)]
pub struct Database {
    pub(crate) users: RwLock<Table<User>>,
    pub(crate) items: RwLock<Table<Item>>,
}

/// Record counts at one point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub users: usize,
    pub items: usize,
}

/// User total and inventory figures read from the same state of both tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsSnapshot {
    pub users: usize,
    pub inventory: InventoryStats,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns both table sizes under a consistent read of the two tables.
    pub async fn counts(&self) -> Counts {
        let users = self.users.read().await;
        let items = self.items.read().await;
        Counts {
            users: users.len(),
            items: items.len(),
        }
    }

    /// Computes statistics while holding both read guards.
    pub async fn stats(&self) -> StatsSnapshot {
        let users = self.users.read().await;
        let items = self.items.read().await;
        StatsSnapshot {
            users: users.len(),
            inventory: InventoryStats::compute(items.iter()),
        }
    }

    /// Clears both tables. Readers never observe only one of them cleared.
    pub async fn reset(&self) -> Counts {
        let mut users = self.users.write().await;
        let mut items = self.items.write().await;
        let cleared = Counts {
            users: users.len(),
            items: items.len(),
        };
        users.clear();
        items.clear();
        cleared
    }
}
