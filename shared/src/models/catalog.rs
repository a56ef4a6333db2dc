//! Storefront Catalog Model
//!
//! Public storefront entries ("boutique"). Independent of the stock
//! products; an entry may link back to one through `product_id`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{self, Keyed, RowId};

/// Storefront catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(deserialize_with = "types::row_id")]
    pub id: RowId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub olfactory_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i64>,
    /// Link to the stock product backing this entry, if any
    #[serde(default, deserialize_with = "types::opt_row_id")]
    pub product_id: Option<RowId>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Keyed for CatalogItem {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Create catalog entry payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub olfactory_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RowId>,
    pub is_active: bool,
    pub is_featured: bool,
}

/// Update catalog entry payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub olfactory_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_ml: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<RowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
}
