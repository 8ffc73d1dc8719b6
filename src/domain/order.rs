use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::CatalogError;
use super::product::Product;

/// A caller's request for one product. `quantity` is checked to be positive
/// before any collaborator is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestedLine {
    pub product_id: String,
    pub quantity: u32,
}

impl RequestedLine {
    pub fn new(product_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Line item carrying a frozen copy of the product as it was when ordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedProduct {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub quantity: u32,
}

impl OrderedProduct {
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.clone(),
            quantity,
        }
    }

    pub fn line_total(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }

    /// Overwrites the display fields with live catalog values. Quantity and
    /// the owning order's total are left alone.
    pub fn refresh_display(&mut self, product: &Product) {
        self.name.clone_from(&product.name);
        self.description.clone_from(&product.description);
        self.price.clone_from(&product.price);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: Uuid,
    pub account_id: String,
    pub lines: Vec<OrderedProduct>,
    pub total_price: BigDecimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Assembles a new order with a fresh id, stamping `now` as creation time
    /// and fixing the total from the line snapshots.
    pub fn new(account_id: impl Into<String>, lines: Vec<OrderedProduct>) -> Self {
        let total_price = total_of(&lines);
        Self {
            id: Uuid::new_v4(),
            account_id: account_id.into(),
            lines,
            total_price,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    pub fn product_ids(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.product_id.as_str())
    }
}

pub fn total_of(lines: &[OrderedProduct]) -> BigDecimal {
    lines
        .iter()
        .fold(BigDecimal::from(0), |acc, line| acc + line.line_total())
}

/// Whether the display fields of a listing were refreshed from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enrichment {
    Complete,
    /// The catalog could not be read; lines show their stored snapshots.
    Degraded(CatalogError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderHistory {
    pub orders: Vec<Order>,
    pub enrichment: Enrichment,
}

impl OrderHistory {
    pub fn is_degraded(&self) -> bool {
        matches!(self.enrichment, Enrichment::Degraded(_))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn new_order_total_is_exact_sum_of_snapshots() {
        let p1 = Product::new("P1", "Widget", "A widget", dec("9.99"));
        let p2 = Product::new("P2", "Gadget", "A gadget", dec("4.50"));

        let order = Order::new(
            "A1",
            vec![OrderedProduct::snapshot(&p1, 2), OrderedProduct::snapshot(&p2, 1)],
        );

        assert_eq!(order.total_price, dec("24.48"));
        assert_eq!(order.account_id, "A1");
        assert!(order.updated_at.is_none());
    }

    #[test]
    fn refresh_display_keeps_quantity_and_order_total() {
        let p1 = Product::new("P1", "Widget", "A widget", dec("9.99"));
        let mut order = Order::new("A1", vec![OrderedProduct::snapshot(&p1, 3)]);

        let repriced = Product::new("P1", "Widget v2", "Improved", dec("7.99"));
        order.lines[0].refresh_display(&repriced);

        assert_eq!(order.lines[0].price, dec("7.99"));
        assert_eq!(order.lines[0].name, "Widget v2");
        assert_eq!(order.lines[0].quantity, 3);
        assert_eq!(order.total_price, dec("29.97"));
    }

    #[test]
    fn fresh_orders_get_distinct_ids() {
        let a = Order::new("A1", vec![]);
        let b = Order::new("A1", vec![]);
        assert_ne!(a.id, b.id);
        assert_eq!(a.total_price, BigDecimal::from(0));
    }
}
