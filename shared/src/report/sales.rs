//! Sales reporting: revenue totals, per-product rollup, daily series

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Sale;
use crate::types::RowId;

/// Placeholder name for a sale whose product was deleted since.
pub const UNKNOWN_PRODUCT_NAME: &str = "Produit inconnu/supprimé";
/// Placeholder SKU for the same case.
pub const UNKNOWN_SKU: &str = "???";

/// Per-product revenue rollup entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRollup {
    pub product_id: RowId,
    pub name: String,
    pub sku: String,
    pub quantity: i64,
    pub revenue: Decimal,
}

/// One point of the daily revenue series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Total revenue: the sum of each sale's recorded total price.
///
/// Uses the stored totals, not quantity times a live price, so the figure
/// stays accurate after later price edits.
pub fn revenue_total(sales: &[Sale]) -> Decimal {
    sales.iter().map(|s| s.total_price).sum()
}

/// Fold the sale list once into per-product cumulative quantity and
/// revenue, then return the entries sorted by revenue descending. Ties keep
/// encounter order (stable sort).
pub fn sales_by_product(sales: &[Sale]) -> Vec<ProductRollup> {
    let mut rollup: Vec<ProductRollup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for sale in sales {
        let at = *index.entry(sale.product_id.as_str()).or_insert_with(|| {
            let (name, sku) = match sale.products.as_ref() {
                Some(p) => (p.name.clone(), p.sku.clone()),
                None => (UNKNOWN_PRODUCT_NAME.to_string(), UNKNOWN_SKU.to_string()),
            };
            rollup.push(ProductRollup {
                product_id: sale.product_id.clone(),
                name,
                sku,
                quantity: 0,
                revenue: Decimal::ZERO,
            });
            rollup.len() - 1
        });
        rollup[at].quantity += sale.quantity;
        rollup[at].revenue += sale.total_price;
    }

    rollup.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    rollup
}

/// Daily revenue series for charting.
///
/// Sales are sorted ascending by creation time, then folded by calendar
/// date (day granularity, no timezone normalization), so the output is
/// ordered by first-seen date ascending.
pub fn revenue_by_day(sales: &[Sale]) -> Vec<DailyRevenue> {
    let mut sorted: Vec<&Sale> = sales.iter().collect();
    sorted.sort_by_key(|s| s.created_at);

    let mut series: Vec<DailyRevenue> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for sale in sorted {
        let date = sale.created_at.date_naive();
        let at = *index.entry(date).or_insert_with(|| {
            series.push(DailyRevenue {
                date,
                total: Decimal::ZERO,
            });
            series.len() - 1
        });
        series[at].total += sale.total_price;
    }

    series
}

/// Keep the sales falling in the given year, and month when provided
/// (1-based, matching the calendar).
pub fn filter_period(sales: &[Sale], year: i32, month: Option<u32>) -> Vec<Sale> {
    sales
        .iter()
        .filter(|s| {
            s.created_at.year() == year && month.is_none_or(|m| s.created_at.month() == m)
        })
        .cloned()
        .collect()
}
