//! User model module.
//!
//! Contains the user entity and the repository for user data access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::database::Database;
use crate::models::table::Page;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub created_at: DateTime<Utc>,
}

/// Validated data for a new user. The id and creation time are assigned on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Partial update for a user. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<i64>,
}

impl User {
    fn from_new(new_user: NewUser) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: new_user.name,
            email: new_user.email,
            age: new_user.age,
            created_at: Utc::now(),
        }
    }

    /// Applies the fields present in `changes`.
    pub fn apply(&mut self, changes: UserChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(age) = changes.age {
            self.age = age;
        }
    }
}

/// User repository for in-memory data access.
pub struct UserRepository;

impl UserRepository {
    /// Stores a new user with a fresh id and creation timestamp.
    pub async fn create(db: &Database, new_user: NewUser) -> User {
        let user = User::from_new(new_user);
        db.users.write().await.insert(user.id.clone(), user.clone());
        tracing::info!(user_id = %user.id, "User created");
        user
    }

    /// Returns one page of users in creation order.
    pub async fn list(db: &Database, page: Page) -> Vec<User> {
        let users = db.users.read().await;
        page.apply(users.iter()).cloned().collect()
    }

    pub async fn find_by_id(db: &Database, user_id: &str) -> Option<User> {
        db.users.read().await.get(user_id).cloned()
    }

    /// Updates the given fields, returning the stored user or `None` if absent.
    pub async fn update(db: &Database, user_id: &str, changes: UserChanges) -> Option<User> {
        let mut users = db.users.write().await;
        let user = users.get_mut(user_id)?;
        user.apply(changes);
        tracing::info!(user_id = %user_id, "User updated");
        Some(user.clone())
    }

    /// Deletes a user. Returns `false` if no user had that id.
    pub async fn delete(db: &Database, user_id: &str) -> bool {
        let removed = db.users.write().await.remove(user_id).is_some();
        if removed {
            tracing::info!(user_id = %user_id, "User deleted");
        }
        removed
    }

    /// Finds users whose email contains `needle`, ignoring case.
    pub async fn search_by_email(db: &Database, needle: &str) -> Vec<User> {
        let needle = needle.to_lowercase();
        let users = db.users.read().await;
        users
            .iter()
            .filter(|user| user.email.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}
