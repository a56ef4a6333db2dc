//! Aggregation and reporting
//!
//! Pure functions over already-fetched row sets. Every figure is recomputed
//! from scratch on each call; nothing here is memoized, so editing a
//! reference price and recomputing changes margin figures retroactively.

mod purchases;
mod sales;

pub use purchases::{MarginSummary, expense_total, filter_by_supplier, margin, stock_value};
pub use sales::{
    DailyRevenue, ProductRollup, UNKNOWN_PRODUCT_NAME, UNKNOWN_SKU, filter_period,
    revenue_by_day, revenue_total, sales_by_product,
};
