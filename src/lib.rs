//! Showcase - persistence core of a portfolio site
//!
//! A TTL cache with a background sweep task, an embedded bucketed store, and
//! the cache-aside data layer that keeps the two consistent, served through
//! an admin JSON API.

pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod slug;
pub mod store;
pub mod tasks;
pub mod themes;

pub use api::{create_router, AppState};
pub use cache::{TtlCache, NO_EXPIRATION};
pub use config::Config;
pub use db::{CachedDatabase, RecordCache};
pub use error::{AppError, Result};
pub use store::{Store, StoreError};
