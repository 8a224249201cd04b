//! Services for the public portal.
//!
//! - `cache` - `moka` cache for catalog, panchayath and announcement lists
//! - `listener` - `LISTEN`/`NOTIFY` task that keeps the cache fresh

pub mod cache;
pub mod listener;

pub use cache::CatalogCache;
pub use listener::spawn_listener;
