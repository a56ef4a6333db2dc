//! Sale Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{self, RowId};

use super::ProductRef;

/// Sale history row, with the joined product columns
/// (`select=*, products(name, sku)`).
///
/// Sales are append-only. A trigger on the remote store decrements the
/// product's stock when the row is inserted; the client never performs
/// that decrement itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    #[serde(deserialize_with = "types::row_id")]
    pub product_id: RowId,
    pub quantity: i64,
    /// Unit price at the time of sale
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_unit: Option<Decimal>,
    /// Recorded total; reports sum this, not quantity times a live price
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductRef>,
}

/// Record sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub product_id: RowId,
    pub quantity: i64,
    pub price_unit: Decimal,
    pub total_price: Decimal,
}

impl SaleCreate {
    /// Build a sale for `quantity` units at `price_unit`, computing the
    /// recorded total.
    pub fn with_total(product_id: RowId, quantity: i64, price_unit: Decimal) -> Self {
        Self {
            product_id,
            quantity,
            price_unit,
            total_price: price_unit * Decimal::from(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_total_records_quantity_times_unit_price() {
        let sale = SaleCreate::with_total("p1".into(), 3, Decimal::new(4950, 2));
        assert_eq!(sale.total_price, Decimal::new(14850, 2));
    }
}
