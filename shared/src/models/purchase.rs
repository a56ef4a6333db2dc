//! Purchase (stock-in) Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{self, RowId};

use super::{ProductRef, SupplierRef};

/// Purchase history row, with the joined product and supplier columns
/// (`select=*, products(name, sku), suppliers(name)`).
///
/// Purchases are append-only; no update or delete path exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    #[serde(deserialize_with = "types::row_id")]
    pub product_id: RowId,
    #[serde(deserialize_with = "types::row_id")]
    pub supplier_id: RowId,
    pub quantity: i64,
    /// Supplier unit price at purchase time
    pub supplier_price: Decimal,
    pub created_at: DateTime<Utc>,
    /// Joined product row; `None` when the product was deleted since
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suppliers: Option<SupplierRef>,
}

/// Record purchase payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseCreate {
    pub product_id: RowId,
    pub supplier_id: RowId,
    pub quantity: i64,
    pub supplier_price: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_row_decodes_with_missing_product() {
        let body = r#"{
            "id": 12,
            "product_id": "9f2c",
            "supplier_id": 3,
            "quantity": 5,
            "supplier_price": 18.5,
            "created_at": "2025-11-02T09:30:00Z",
            "products": null,
            "suppliers": {"name": "Grasse Aromes"}
        }"#;
        let row: Purchase = serde_json::from_str(body).unwrap();
        assert_eq!(row.supplier_id, "3");
        assert!(row.products.is_none());
        assert_eq!(row.suppliers.as_ref().unwrap().name, "Grasse Aromes");
    }
}
