//! Item model module.
//!
//! Contains the item entity, inventory statistics, and the item repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::database::Database;
use crate::models::table::Page;

/// A product in the inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated data for a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i64,
}

/// Partial update for an item.
///
/// `description: Some(None)` clears the description; `None` leaves it alone.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

/// Inclusive price bounds. An absent bound does not filter.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PriceRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        self.min.map_or(true, |min| price >= min) && self.max.map_or(true, |max| price <= max)
    }
}

/// Aggregate figures over all items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InventoryStats {
    pub total: usize,
    pub total_inventory_value: f64,
    pub average_price: f64,
}

impl InventoryStats {
    /// Computes totals over `items`, rounding money values to cents.
    #[allow(clippy::cast_precision_loss)]
    pub fn compute<'a>(items: impl Iterator<Item = &'a Item>) -> Self {
        let (total, value, price_sum) = items.fold((0usize, 0.0, 0.0), |(n, value, sum), item| {
            (n + 1, value + item.price * item.quantity as f64, sum + item.price)
        });
        let average = if total == 0 {
            0.0
        } else {
            price_sum / total as f64
        };
        Self {
            total,
            total_inventory_value: round_cents(value),
            average_price: round_cents(average),
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Item {
    fn from_new(new_item: NewItem) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: new_item.title,
            description: new_item.description,
            price: new_item.price,
            quantity: new_item.quantity,
            created_at: Utc::now(),
        }
    }

    /// Applies the fields present in `changes`.
    pub fn apply(&mut self, changes: ItemChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
    }
}

/// Item repository for in-memory data access.
pub struct ItemRepository;

impl ItemRepository {
    /// Stores a new item with a fresh id and creation timestamp.
    pub async fn create(db: &Database, new_item: NewItem) -> Item {
        let item = Item::from_new(new_item);
        db.items.write().await.insert(item.id.clone(), item.clone());
        tracing::info!(item_id = %item.id, "Item created");
        item
    }

    /// Filters by price first, then returns one page in creation order.
    pub async fn list(db: &Database, prices: PriceRange, page: Page) -> Vec<Item> {
        let items = db.items.read().await;
        page.apply(items.iter().filter(|item| prices.contains(item.price)))
            .cloned()
            .collect()
    }

    pub async fn find_by_id(db: &Database, item_id: &str) -> Option<Item> {
        db.items.read().await.get(item_id).cloned()
    }

    /// Updates the given fields, returning the stored item or `None` if absent.
    pub async fn update(db: &Database, item_id: &str, changes: ItemChanges) -> Option<Item> {
        let mut items = db.items.write().await;
        let item = items.get_mut(item_id)?;
        item.apply(changes);
        tracing::info!(item_id = %item_id, "Item updated");
        Some(item.clone())
    }

    /// Deletes an item. Returns `false` if no item had that id.
    pub async fn delete(db: &Database, item_id: &str) -> bool {
        let removed = db.items.write().await.remove(item_id).is_some();
        if removed {
            tracing::info!(item_id = %item_id, "Item deleted");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item(title: &str, price: f64, quantity: i64) -> NewItem {
        NewItem {
            title: title.to_string(),
            description: Some(format!("{title} description")),
            price,
            quantity,
        }
    }

    #[test]
    fn test_price_range_unbounded_accepts_all() {
        let range = PriceRange::default();
        assert!(range.contains(0.01));
        assert!(range.contains(1_000_000.0));
    }

    #[test]
    fn test_price_range_bounds_are_inclusive() {
        let range = PriceRange {
            min: Some(10.0),
            max: Some(20.0),
        };
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(9.99));
        assert!(!range.contains(20.01));
    }

    #[test]
    fn test_stats_empty() {
        let stats = InventoryStats::compute(std::iter::empty());
        assert_eq!(stats.total, 0);
        assert!(stats.total_inventory_value.abs() < f64::EPSILON);
        assert!(stats.average_price.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_stats_rounds_to_cents() {
        let db = Database::new();
        ItemRepository::create(&db, new_item("a", 10.0, 3)).await;
        ItemRepository::create(&db, new_item("b", 0.333, 1)).await;
        ItemRepository::create(&db, new_item("c", 5.0, 0)).await;

        let stats = db.stats().await.inventory;
        assert_eq!(stats.total, 3);
        // 30 + 0.333 + 0
        assert!((stats.total_inventory_value - 30.33).abs() < 1e-9);
        // (10 + 0.333 + 5) / 3 = 5.111
        assert!((stats.average_price - 5.11).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_list_filters_before_paging() {
        let db = Database::new();
        for (title, price) in [("a", 5.0), ("b", 15.0), ("c", 25.0), ("d", 15.5), ("e", 50.0)] {
            ItemRepository::create(&db, new_item(title, price, 1)).await;
        }

        let prices = PriceRange {
            min: Some(10.0),
            max: Some(30.0),
        };
        let titles: Vec<String> = ItemRepository::list(&db, prices, Page::new(1, 10))
            .await
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, ["c", "d"]);
    }

    #[tokio::test]
    async fn test_update_can_clear_description() {
        let db = Database::new();
        let item = ItemRepository::create(&db, new_item("pen", 2.5, 4)).await;
        assert!(item.description.is_some());

        let changes = ItemChanges {
            description: Some(None),
            quantity: Some(7),
            ..ItemChanges::default()
        };
        let updated = ItemRepository::update(&db, &item.id, changes).await.unwrap();

        assert!(updated.description.is_none());
        assert_eq!(updated.quantity, 7);
        assert!((updated.price - 2.5).abs() < f64::EPSILON);
        assert_eq!(updated.title, "pen");
    }

    #[tokio::test]
    async fn test_update_without_description_keeps_it() {
        let db = Database::new();
        let item = ItemRepository::create(&db, new_item("pen", 2.5, 4)).await;

        let changes = ItemChanges {
            title: Some("marker".to_string()),
            ..ItemChanges::default()
        };
        let updated = ItemRepository::update(&db, &item.id, changes).await.unwrap();
        assert_eq!(updated.title, "marker");
        assert_eq!(updated.description, item.description);
    }

    #[tokio::test]
    async fn test_delete_and_find() {
        let db = Database::new();
        let item = ItemRepository::create(&db, new_item("pen", 1.0, 1)).await;

        assert_eq!(ItemRepository::find_by_id(&db, &item.id).await, Some(item.clone()));
        assert!(ItemRepository::delete(&db, &item.id).await);
        assert!(ItemRepository::find_by_id(&db, &item.id).await.is_none());
        assert!(!ItemRepository::delete(&db, &item.id).await);
    }
}
