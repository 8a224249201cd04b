//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Format an amount as rupees: `{{ fee|rupees }}` renders `₹250`.
#[askama::filter_fn]
pub fn rupees(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!("₹{value}"))
}
