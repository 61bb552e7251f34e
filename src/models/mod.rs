//! Model module.
//!
//! Contains domain entities, the in-memory database, and repositories for data access.

pub mod database;
pub mod item;
pub mod table;
pub mod user;

pub use database::*;
pub use item::*;
pub use table::*;
pub use user::*;
