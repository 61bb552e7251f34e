//! First UV Pro API.
//!
//! A JSON REST API managing users and items in an in-memory store.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
