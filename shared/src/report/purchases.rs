//! Purchase reporting: expenses, stock value, margin estimation

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Product, Purchase};

/// Margin figures over a purchase set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginSummary {
    /// Estimated resale value at the products' current reference prices
    pub sales_value: Decimal,
    /// Money spent: quantity times supplier unit price
    pub expenses: Decimal,
    pub margin: Decimal,
}

/// Total expense over the purchase list.
pub fn expense_total(purchases: &[Purchase]) -> Decimal {
    purchases
        .iter()
        .map(|p| Decimal::from(p.quantity) * p.supplier_price)
        .sum()
}

/// Margin estimate for the purchase list against the live product list.
///
/// The resale side uses each product's *current* reference price, looked up
/// from the shared product collection; a purchased product that was deleted
/// or never priced contributes zero. Reference-price edits therefore change
/// these figures retroactively on the next recompute.
pub fn margin(purchases: &[Purchase], products: &[Product]) -> MarginSummary {
    let expenses = expense_total(purchases);
    let sales_value = purchases
        .iter()
        .map(|purchase| {
            let reference = products
                .iter()
                .find(|p| p.id == purchase.product_id)
                .and_then(|p| p.reference_price)
                .unwrap_or(Decimal::ZERO);
            Decimal::from(purchase.quantity) * reference
        })
        .sum();
    MarginSummary {
        sales_value,
        expenses,
        margin: sales_value - expenses,
    }
}

/// Inventory value at list prices: Σ current_stock × price.
pub fn stock_value(products: &[Product]) -> Decimal {
    products
        .iter()
        .map(|p| Decimal::from(p.current_stock) * p.price.unwrap_or(Decimal::ZERO))
        .sum()
}

/// Purchases for one supplier; `None` keeps the whole list.
pub fn filter_by_supplier(purchases: &[Purchase], supplier_id: Option<&str>) -> Vec<Purchase> {
    match supplier_id {
        None => purchases.to_vec(),
        Some(id) => purchases
            .iter()
            .filter(|p| p.supplier_id == id)
            .cloned()
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn purchase(product_id: &str, supplier_id: &str, qty: i64, price: i64) -> Purchase {
        Purchase {
            id: format!("{product_id}-{qty}"),
            product_id: product_id.into(),
            supplier_id: supplier_id.into(),
            quantity: qty,
            supplier_price: Decimal::from(price),
            created_at: Utc.with_ymd_and_hms(2025, 10, 12, 8, 0, 0).unwrap(),
            products: None,
            suppliers: None,
        }
    }

    fn product(id: &str, reference_price: Option<i64>) -> Product {
        Product {
            id: id.into(),
            sku: format!("SKU-{id}"),
            name: format!("Produit {id}"),
            current_stock: 0,
            min_stock_threshold: 5,
            price: None,
            reference_price: reference_price.map(Decimal::from),
            description: None,
            image_url: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn margin_is_reference_value_minus_expenses() {
        let purchases = vec![purchase("p1", "f1", 10, 8), purchase("p2", "f1", 4, 20)];
        let products = vec![product("p1", Some(15)), product("p2", Some(30))];

        let summary = margin(&purchases, &products);
        assert_eq!(summary.expenses, Decimal::from(160));
        assert_eq!(summary.sales_value, Decimal::from(270));
        assert_eq!(summary.margin, Decimal::from(110));
    }

    #[test]
    fn margin_recomputes_after_reference_price_edit() {
        let purchases = vec![purchase("p1", "f1", 10, 8)];
        let mut products = vec![product("p1", Some(15))];

        let before = margin(&purchases, &products);
        products[0].reference_price = Some(Decimal::from(20));
        let after = margin(&purchases, &products);

        assert_eq!(before.margin, Decimal::from(70));
        assert_eq!(after.margin, Decimal::from(120));
    }

    #[test]
    fn unpriced_or_deleted_products_contribute_zero_resale_value() {
        let purchases = vec![purchase("p1", "f1", 3, 10), purchase("gone", "f1", 2, 5)];
        let products = vec![product("p1", None)];

        let summary = margin(&purchases, &products);
        assert_eq!(summary.sales_value, Decimal::ZERO);
        assert_eq!(summary.margin, Decimal::from(-40));
    }

    #[test]
    fn supplier_filter_keeps_all_when_unset() {
        let purchases = vec![purchase("p1", "f1", 1, 1), purchase("p2", "f2", 1, 1)];
        assert_eq!(filter_by_supplier(&purchases, None).len(), 2);
        let only_f2 = filter_by_supplier(&purchases, Some("f2"));
        assert_eq!(only_f2.len(), 1);
        assert_eq!(only_f2[0].supplier_id, "f2");
    }
}
