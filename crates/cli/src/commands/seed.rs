//! Sample reference data for local development.
//!
//! Rows whose names already exist are left untouched, so the command can be
//! re-run safely.

use rust_decimal::Decimal;

use super::{CommandError, connect};

/// `(name, district)`
const PANCHAYATHS: &[(&str, &str)] = &[
    ("Kadakkal", "Kollam"),
    ("Chithara", "Kollam"),
    ("Nilamel", "Kollam"),
    ("Pothencode", "Thiruvananthapuram"),
    ("Kallara", "Thiruvananthapuram"),
];

/// `(name, actual fee, offer fee, highlighted)` with fees in paise.
const CATEGORIES: &[(&str, i64, i64, bool)] = &[
    ("Trade License", 50_000, 25_000, true),
    ("Tailoring Unit", 30_000, 20_000, false),
    ("Dairy Farming", 40_000, 30_000, false),
    ("Food Processing", 60_000, 45_000, false),
    ("Kudumbashree Enterprise", 10_000, 0, true),
];

pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;
    let mut tx = pool.begin().await?;

    let mut panchayaths = 0_u64;
    for (name, district) in PANCHAYATHS {
        panchayaths += sqlx::query(
            "INSERT INTO panchayaths (name, district) VALUES ($1, $2) \
             ON CONFLICT (district, name) DO NOTHING",
        )
        .bind(*name)
        .bind(*district)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    let mut categories = 0_u64;
    for (name, actual, offer, highlighted) in CATEGORIES {
        categories += sqlx::query(
            "INSERT INTO categories (name, actual_fee, offer_fee, is_highlighted) \
             VALUES ($1, $2, $3, $4) ON CONFLICT (name) DO NOTHING",
        )
        .bind(*name)
        .bind(Decimal::new(*actual, 2))
        .bind(Decimal::new(*offer, 2))
        .bind(*highlighted)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;

    tracing::info!(panchayaths, categories, "Seed data inserted");
    Ok(())
}
