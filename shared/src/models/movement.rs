//! Stock Movement Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{self, RowId};

/// Direction of a manual stock adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementKind {
    #[serde(rename = "IN")]
    In,
    #[serde(rename = "OUT")]
    Out,
}

impl MovementKind {
    /// Direction for a signed stock delta.
    pub fn from_delta(delta: i64) -> Self {
        if delta > 0 { Self::In } else { Self::Out }
    }
}

/// Stock movement ledger row. Append-only, one per manual adjustment;
/// the quantity is always recorded positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockMovement {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    #[serde(deserialize_with = "types::row_id")]
    pub product_id: RowId,
    pub movement_type: MovementKind,
    pub quantity: i64,
    /// Stock level after the movement, for history charting
    pub new_stock_level: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Record movement payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementCreate {
    pub product_id: RowId,
    pub movement_type: MovementKind,
    pub quantity: i64,
    pub new_stock_level: i64,
}

impl MovementCreate {
    /// Movement row for a signed delta against the given current stock.
    pub fn from_delta(product_id: RowId, current_stock: i64, delta: i64) -> Self {
        Self {
            product_id,
            movement_type: MovementKind::from_delta(delta),
            quantity: delta.abs(),
            new_stock_level: current_stock + delta,
        }
    }
}
