//! Core types for ESEP.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod change;
pub mod fee;
pub mod id;
pub mod phone;
pub mod role;
pub mod status;

pub use change::{CHANGE_CHANNEL, ChangeOp, TableChange, TableChangeError, WatchedTable};
pub use fee::{Fee, FeeError, Pricing};
pub use id::*;
pub use phone::{PhoneError, PhoneNumber};
pub use role::{AdminRole, Permissions};
pub use status::RegistrationStatus;
