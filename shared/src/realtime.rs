//! Realtime change-feed types
//!
//! Row-level change notifications pushed by the hosted backend. The
//! transport decodes its wire frames into [`ChangeEvent`]; everything past
//! that point works with these typed values only.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::RowId;

/// Kind of row change, as tagged on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

/// One row-level change notification.
///
/// `new` carries the full row for inserts and updates; `old` carries at
/// least the primary key for updates and deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "eventType")]
    pub kind: ChangeKind,
    pub schema: String,
    pub table: String,
    #[serde(default)]
    pub old: Option<Value>,
    #[serde(default)]
    pub new: Option<Value>,
}

impl ChangeEvent {
    /// Whether this event targets the given collection.
    pub fn is_for(&self, schema: &str, table: &str) -> bool {
        self.schema == schema && self.table == table
    }

    /// Decode the new row into a typed record.
    pub fn new_row<T: serde::de::DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.new
            .as_ref()
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }

    /// Id of the old row, normalized to a string. Deletes only ship the
    /// primary key in `old`.
    pub fn old_id(&self) -> Option<RowId> {
        match self.old.as_ref()?.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
