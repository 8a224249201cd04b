//! Row-change notifications published by the database.
//!
//! A trigger on each watched table calls
//! `pg_notify('esep_changes', '{"table": ..., "op": ..., "id": ...}')`.
//! Both binaries listen on that channel to invalidate cached lists, and the
//! admin binary forwards each change to open dashboards over SSE.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The `LISTEN`/`NOTIFY` channel carrying [`TableChange`] payloads.
pub const CHANGE_CHANNEL: &str = "esep_changes";

/// Tables that publish change notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchedTable {
    Categories,
    Registrations,
    Panchayaths,
    Announcements,
}

impl WatchedTable {
    /// The SQL table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Categories => "categories",
            Self::Registrations => "registrations",
            Self::Panchayaths => "panchayaths",
            Self::Announcements => "announcements",
        }
    }
}

/// The kind of row change (`TG_OP` in the trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeOp {
    Insert,
    Update,
    Delete,
}

/// Error parsing a notification payload.
#[derive(thiserror::Error, Debug)]
#[error("invalid change payload: {0}")]
pub struct TableChangeError(#[from] serde_json::Error);

/// A single row change on a watched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableChange {
    /// Table the row belongs to.
    pub table: WatchedTable,
    /// What happened to the row.
    pub op: ChangeOp,
    /// Primary key of the changed row, when the trigger supplied one.
    #[serde(default)]
    pub id: Option<Uuid>,
}

impl TableChange {
    /// Parse a JSON notification payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is not valid JSON or names an
    /// unwatched table.
    pub fn parse(payload: &str) -> Result<Self, TableChangeError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trigger_payload() {
        let change = TableChange::parse(
            r#"{"table":"categories","op":"UPDATE","id":"7f1c3c1e-2f4d-4b8a-9b1e-5d2f8c6a9e01"}"#,
        )
        .unwrap();
        assert_eq!(change.table, WatchedTable::Categories);
        assert_eq!(change.op, ChangeOp::Update);
        assert!(change.id.is_some());
    }

    #[test]
    fn test_parse_without_id() {
        let change = TableChange::parse(r#"{"table":"panchayaths","op":"DELETE"}"#).unwrap();
        assert_eq!(change.table, WatchedTable::Panchayaths);
        assert_eq!(change.id, None);
    }

    #[test]
    fn test_parse_rejects_unwatched_table() {
        assert!(TableChange::parse(r#"{"table":"admin_users","op":"INSERT"}"#).is_err());
    }

    #[test]
    fn test_serialized_form_matches_trigger() {
        let change = TableChange {
            table: WatchedTable::Announcements,
            op: ChangeOp::Insert,
            id: None,
        };
        let json = serde_json::to_string(&change).unwrap();
        assert_eq!(json, r#"{"table":"announcements","op":"INSERT","id":null}"#);
    }
}
