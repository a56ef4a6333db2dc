//! Product and stock operations

use serde::Deserialize;

use shared::models::{MovementCreate, Product, ProductCreate, ProductUpdate, StockMovement};

use crate::error::{ClientError, ClientResult};

use super::ComptoirClient;

#[derive(Debug, Deserialize)]
struct StockRow {
    current_stock: i64,
}

impl ComptoirClient {
    /// Load the full product list into the shared store, sorted by name.
    pub async fn load_products(&self) -> ClientResult<()> {
        let rows: Vec<Product> = self
            .rest()
            .select("products", &[("select", "*"), ("order", "name.asc")])
            .await?;
        tracing::debug!(count = rows.len(), "products loaded");
        self.store().products.replace(rows);
        Ok(())
    }

    /// Create a product. A duplicate SKU surfaces as a unique-violation
    /// API error (SQLSTATE 23505).
    pub async fn create_product(&self, product: ProductCreate) -> ClientResult<()> {
        if product.sku.trim().len() < 3 {
            return Err(ClientError::Validation(
                "Le SKU doit contenir au moins 3 caractères.".into(),
            ));
        }
        if product.name.trim().is_empty() {
            return Err(ClientError::Validation("Le nom est obligatoire.".into()));
        }
        if product.min_stock_threshold < 0 {
            return Err(ClientError::Validation(
                "Le seuil d'alerte doit être positif ou nul.".into(),
            ));
        }
        self.rest().insert("products", &product).await
        // The store picks the new row up through the realtime feed.
    }

    /// Patch a product (price edits, renames).
    pub async fn update_product(&self, id: &str, updates: ProductUpdate) -> ClientResult<()> {
        self.rest().update("products", id, &updates).await
    }

    /// Manual stock adjustment: record one movement of `delta` units.
    ///
    /// The current level is read from the remote row, and a decrement that
    /// would land below zero is refused before any write is issued — the
    /// cached store value stays untouched until a confirmed write comes
    /// back through the feed. The remote check constraint backs this up
    /// with SQLSTATE 23514 if a concurrent change wins.
    pub async fn adjust_stock(&self, product_id: &str, delta: i64) -> ClientResult<()> {
        if delta == 0 {
            return Err(ClientError::Validation("Ajustement de stock nul.".into()));
        }

        let id_filter = format!("eq.{product_id}");
        let row: StockRow = self
            .rest()
            .select_single(
                "products",
                &[("select", "current_stock"), ("id", id_filter.as_str())],
            )
            .await?;

        if row.current_stock + delta < 0 {
            return Err(ClientError::StockFloor);
        }

        let movement = MovementCreate::from_delta(product_id.to_string(), row.current_stock, delta);
        self.rest().insert("movements", &movement).await
    }

    /// Movement ledger for one product, oldest first (chart order).
    pub async fn stock_history(&self, product_id: &str) -> ClientResult<Vec<StockMovement>> {
        let id_filter = format!("eq.{product_id}");
        self.rest()
            .select(
                "movements",
                &[
                    ("select", "*"),
                    ("product_id", id_filter.as_str()),
                    ("order", "created_at.asc"),
                ],
            )
            .await
    }
}
