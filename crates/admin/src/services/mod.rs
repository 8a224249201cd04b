//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Username/password login with Argon2id hashes
//! - `cache` - `moka` cache for the category list
//! - `changes` - `LISTEN`/`NOTIFY` change feed for live refresh

pub mod auth;
pub mod cache;
pub mod changes;

pub use auth::{AdminAuthError, AdminAuthService};
pub use cache::CategoryCache;
pub use changes::{ChangeFeed, FeedEvent, spawn_listener};
