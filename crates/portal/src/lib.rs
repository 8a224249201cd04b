//! ESEP Portal library.
//!
//! The binary in `main.rs` wires these modules into the public site; the
//! library form lets tests drive the router directly.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
