//! Product Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{self, Keyed, RowId};

/// Product entity
///
/// `current_stock` is kept non-negative by a check constraint on the remote
/// store; a violating write comes back as SQLSTATE 23514.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    /// Stock-keeping code, unique, human-assigned
    pub sku: String,
    pub name: String,
    pub current_stock: i64,
    /// Low-stock alert threshold
    pub min_stock_threshold: i64,
    /// List price shown on sale entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Internal reference price used for margin estimation
    #[serde(default, rename = "myprice", skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Keyed for Product {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub sku: String,
    pub name: String,
    pub min_stock_threshold: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "myprice", skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stock_threshold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(rename = "myprice", skip_serializing_if = "Option::is_none")]
    pub reference_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ProductUpdate {
    /// Payload touching only the reference price column.
    pub fn reference_price(price: Decimal) -> Self {
        Self {
            reference_price: Some(price),
            ..Self::default()
        }
    }
}

/// Joined product columns on purchase/sale history rows
/// (`products(name, sku)` in the select).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
    pub sku: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_skips_untouched_columns() {
        let patch = ProductUpdate::reference_price(Decimal::new(1250, 2));
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"myprice":12.5}"#);
    }

    #[test]
    fn product_decodes_numeric_id() {
        let row: Product = serde_json::from_str(
            r#"{"id": 7, "sku": "PRF-001", "name": "Ambre Nuit", "current_stock": 3, "min_stock_threshold": 10}"#,
        )
        .unwrap();
        assert_eq!(row.id, "7");
        assert_eq!(row.current_stock, 3);
        assert!(row.price.is_none());
    }
}
