//! Supplier operations

use shared::models::{Supplier, SupplierCreate};

use crate::error::{ClientError, ClientResult};

use super::ComptoirClient;

impl ComptoirClient {
    /// Load the supplier list into the shared store, sorted by name.
    pub async fn load_suppliers(&self) -> ClientResult<()> {
        let rows: Vec<Supplier> = self
            .rest()
            .select("suppliers", &[("select", "*"), ("order", "name.asc")])
            .await?;
        tracing::debug!(count = rows.len(), "suppliers loaded");
        self.store().suppliers.replace(rows);
        Ok(())
    }

    /// Create a supplier and merge the stored row into the shared store.
    /// Blank contact fields are normalized to NULL before submission.
    pub async fn create_supplier(&self, supplier: SupplierCreate) -> ClientResult<Supplier> {
        if supplier.name.trim().is_empty() {
            return Err(ClientError::Validation(
                "Le nom du fournisseur est obligatoire.".into(),
            ));
        }
        let row: Supplier = self
            .rest()
            .insert_returning("suppliers", &supplier.normalized())
            .await?;
        self.store().suppliers.upsert(row.clone());
        Ok(row)
    }

    /// Delete a supplier and drop it from the shared store.
    pub async fn delete_supplier(&self, id: &str) -> ClientResult<()> {
        self.rest().delete("suppliers", id).await?;
        self.store().suppliers.remove(id);
        Ok(())
    }
}
