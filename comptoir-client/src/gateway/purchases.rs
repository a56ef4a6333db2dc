//! Supplier purchase (stock-in) operations

use rust_decimal::Decimal;

use shared::models::{Purchase, PurchaseCreate};

use crate::error::{ClientError, ClientResult};

use super::ComptoirClient;

impl ComptoirClient {
    /// Record one stock-in purchase. Purchases are immutable once created.
    pub async fn record_purchase(&self, purchase: PurchaseCreate) -> ClientResult<()> {
        if purchase.quantity < 1 {
            return Err(ClientError::Validation(
                "La quantité doit être au moins 1.".into(),
            ));
        }
        if purchase.supplier_price < Decimal::ZERO {
            return Err(ClientError::Validation(
                "Le prix d'achat ne peut pas être négatif.".into(),
            ));
        }
        self.rest().insert("supplier_purchases", &purchase).await
    }

    /// Full purchase history with joined product and supplier names,
    /// newest first.
    pub async fn purchase_history(&self) -> ClientResult<Vec<Purchase>> {
        self.rest()
            .select(
                "supplier_purchases",
                &[
                    ("select", "*, products(name, sku), suppliers(name)"),
                    ("order", "created_at.desc"),
                ],
            )
            .await
    }
}
