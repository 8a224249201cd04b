//! ESEP Admin library.
//!
//! This crate provides the admin functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! # Security
//!
//! This crate holds write access to every ESEP table, including admin
//! accounts and citizen registrations. Deploy it behind the same network
//! controls as the database.

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
