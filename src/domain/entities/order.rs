//! Orders (sales) and their line items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Lifecycle of an order. Only `Pending` orders can change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Completed) | (Self::Pending, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown order status '{other}'")),
        }
    }
}

impl TryFrom<String> for OrderStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// An order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub pharmacy_id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: i64,
    #[sqlx(try_from = "String")]
    pub status: OrderStatus,
    pub total_cents: i64,
    pub delivery_address: Option<String>,
    pub delivery_distance_meters: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A line of an order, priced at the moment the order was placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
}

impl OrderItem {
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * i64::from(self.quantity)
    }
}

/// An order together with its lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// A requested line before pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderLine {
    pub product_id: i64,
    pub quantity: i32,
}

/// Input data for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub pharmacy_id: i64,
    pub customer_id: Option<i64>,
    pub staff_id: i64,
    pub delivery_address: Option<String>,
    pub delivery_distance_meters: Option<i64>,
    pub lines: Vec<NewOrderLine>,
}

/// Collapses repeated products into one line each, summing quantities.
///
/// Output is ordered by product id, which is also the order rows get locked
/// in, so concurrent orders over the same products cannot deadlock.
pub fn merge_lines(lines: &[NewOrderLine]) -> Vec<NewOrderLine> {
    let mut merged: BTreeMap<i64, i32> = BTreeMap::new();
    for line in lines {
        *merged.entry(line.product_id).or_default() += line.quantity;
    }
    merged
        .into_iter()
        .map(|(product_id, quantity)| NewOrderLine {
            product_id,
            quantity,
        })
        .collect()
}

/// Sum of `quantity * unit_price_cents` over priced lines.
pub fn total_cents(lines: impl IntoIterator<Item = (i32, i64)>) -> i64 {
    lines
        .into_iter()
        .map(|(quantity, unit_price)| i64::from(quantity) * unit_price)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(product_id: i64, quantity: i32) -> NewOrderLine {
        NewOrderLine {
            product_id,
            quantity,
        }
    }

    #[test]
    fn test_merge_lines_sums_duplicates_and_sorts() {
        let merged = merge_lines(&[line(7, 1), line(3, 2), line(7, 4)]);
        assert_eq!(merged, vec![line(3, 2), line(7, 5)]);
    }

    #[test]
    fn test_total_cents() {
        assert_eq!(total_cents([(2, 450), (1, 1299)]), 2199);
        assert_eq!(total_cents(Vec::<(i32, i64)>::new()), 0);
    }

    #[test]
    fn test_status_transitions() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Cancelled.can_transition_to(OrderStatus::Pending));
        assert!(!OrderStatus::Pending.can_transition_to(OrderStatus::Pending));
    }

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: 1,
            order_id: 1,
            product_id: 1,
            product_name: "Ibuprofen 400mg".to_string(),
            quantity: 3,
            unit_price_cents: 250,
        };
        assert_eq!(item.line_total_cents(), 750);
    }
}
