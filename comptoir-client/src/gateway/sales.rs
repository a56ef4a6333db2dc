//! Sale operations

use rust_decimal::Decimal;

use shared::models::{Sale, SaleCreate};

use crate::error::{ClientError, ClientResult};

use super::ComptoirClient;

impl ComptoirClient {
    /// Record a sale of `quantity` units at the product's current list
    /// price. The recorded total is quantity × unit price at sale time;
    /// the stock decrement happens through the trigger on the remote
    /// store, never here.
    pub async fn record_sale(&self, product_id: &str, quantity: i64) -> ClientResult<()> {
        if quantity < 1 {
            return Err(ClientError::Validation(
                "La quantité doit être au moins 1.".into(),
            ));
        }
        let price_unit = self
            .store()
            .products
            .snapshot()
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.price.unwrap_or(Decimal::ZERO))
            .ok_or_else(|| ClientError::Validation("Produit introuvable.".into()))?;

        let sale = SaleCreate::with_total(product_id.to_string(), quantity, price_unit);
        self.rest().insert("ventes", &sale).await
    }

    /// Full sale history with joined product names, newest first.
    pub async fn sales_history(&self) -> ClientResult<Vec<Sale>> {
        self.rest()
            .select(
                "ventes",
                &[
                    ("select", "*, products(name, sku)"),
                    ("order", "created_at.desc"),
                ],
            )
            .await
    }
}
