//! ESEP Core - Shared types library.
//!
//! This crate provides common types used across all ESEP components:
//! - `portal` - Public category catalog and registration site
//! - `admin` - Administration dashboard
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. Fee arithmetic and role permissions live here so both
//! binaries render and enforce them identically.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, fees, roles, statuses, phone numbers and change events

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
