//! Storefront catalog operations

use rand::{Rng, distributions::Alphanumeric};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use shared::models::{CatalogItem, CatalogItemCreate, CatalogItemUpdate};

use crate::error::{ClientError, ClientResult};
use crate::image::prepare_image;
use crate::storage::UploadProgress;

use super::ComptoirClient;

impl ComptoirClient {
    /// Storefront entries, newest first. `active_only` limits the list to
    /// the published ones (the public vitrine view).
    pub async fn load_catalog_items(&self, active_only: bool) -> ClientResult<Vec<CatalogItem>> {
        let mut query = vec![("select", "*"), ("order", "created_at.desc")];
        if active_only {
            query.push(("is_active", "eq.true"));
        }
        self.rest().select("boutique_items", &query).await
    }

    pub async fn create_catalog_item(&self, item: CatalogItemCreate) -> ClientResult<()> {
        if item.title.trim().is_empty() {
            return Err(ClientError::Validation("Le titre est obligatoire.".into()));
        }
        if item.price < Decimal::ZERO {
            return Err(ClientError::Validation(
                "Le prix ne peut pas être négatif.".into(),
            ));
        }
        self.rest().insert("boutique_items", &item).await
    }

    pub async fn update_catalog_item(
        &self,
        id: &str,
        updates: CatalogItemUpdate,
    ) -> ClientResult<()> {
        self.rest().update("boutique_items", id, &updates).await
    }

    /// Delete a storefront entry together with its stored image, when one
    /// is attached. The row delete is authoritative; a failing object
    /// delete is logged and does not fail the operation.
    pub async fn delete_catalog_item(
        &self,
        id: &str,
        image_url: Option<&str>,
    ) -> ClientResult<()> {
        self.rest().delete("boutique_items", id).await?;
        if let Some(path) = image_url.and_then(|u| self.storage_path_of(u)) {
            if let Err(e) = self.delete_object(&path).await {
                tracing::warn!(error = %e, %path, "orphaned catalog image not deleted");
            }
        }
        Ok(())
    }

    /// Preprocess and upload a catalog image, returning its public URL.
    ///
    /// The image is decoded, downscaled and re-encoded locally before any
    /// byte leaves the client; the object lands under `boutique/` with a
    /// collision-resistant generated name.
    pub async fn upload_catalog_image(&self, data: &[u8]) -> ClientResult<String> {
        let prepared = prepare_image(data)?;
        let path = Self::generate_image_path();
        self.upload_object(&path, prepared.bytes, "image/jpeg", false)
            .await
    }

    /// Same upload, reporting transfer progress on `progress` so the
    /// shell can render a percentage while the image goes up.
    pub async fn upload_catalog_image_with_progress(
        &self,
        data: &[u8],
        progress: mpsc::UnboundedSender<UploadProgress>,
    ) -> ClientResult<String> {
        let prepared = prepare_image(data)?;
        let path = Self::generate_image_path();
        self.upload_object_with_progress(&path, prepared.bytes, "image/jpeg", false, Some(progress))
            .await
    }

    fn generate_image_path() -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(7)
            .map(char::from)
            .collect();
        format!(
            "boutique/{}_{}.jpg",
            chrono::Utc::now().timestamp_millis(),
            suffix.to_lowercase()
        )
    }
}
