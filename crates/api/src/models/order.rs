//! Order domain types.
//!
//! An order aggregates line items priced at creation time: each item snapshots
//! the product's unit price, and the order total is the sum of the item
//! subtotals. Neither is recomputed afterwards.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use delivery_core::{CustomerId, OrderId, OrderItemId, OrderStatus, ProductId, RestaurantId};

/// Where an order is delivered. Embedded in the order row, not a standalone
/// entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryAddress {
    pub street: String,
    pub number: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// Apartment, floor, gate instructions.
    #[serde(default)]
    pub complement: Option<String>,
}

/// A line item within an order.
#[derive(Debug, Clone)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    pub order_id: OrderId,
    /// Product reference.
    pub product_id: ProductId,
    /// Product name at order time (snapshot, not live-linked).
    pub product_name: String,
    /// Units ordered, at least 1.
    pub quantity: i32,
    /// Product price at order time (snapshot, not live-linked).
    pub unit_price: Decimal,
    /// `unit_price * quantity`, computed at creation.
    pub subtotal: Decimal,
}

/// A placed order with its items.
#[derive(Debug, Clone)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Customer who placed the order (mandatory).
    pub customer_id: CustomerId,
    /// Restaurant fulfilling the order (mandatory).
    pub restaurant_id: RestaurantId,
    /// Delivery destination.
    pub delivery_address: DeliveryAddress,
    /// Sum of item subtotals at creation time.
    pub total: Decimal,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// Line items (one or more).
    pub items: Vec<OrderItem>,
}

/// A line item being created. The unit price has already been snapshotted
/// from the resolved product, and the subtotal computed from it.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl NewOrderItem {
    /// Build a line item from a resolved product, snapshotting its price and
    /// computing the subtotal.
    #[must_use]
    pub fn priced(product: &super::Product, quantity: i32) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            subtotal: product.price * Decimal::from(quantity),
        }
    }
}

/// An order being created. Customer, restaurant, and products have already
/// been resolved by the caller; the total is the sum of the item subtotals.
/// Status is not part of this shape: creation always starts at `CRIADO`.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: CustomerId,
    pub restaurant_id: RestaurantId,
    pub delivery_address: DeliveryAddress,
    pub total: Decimal,
    pub items: Vec<NewOrderItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn product(price: &str) -> Product {
        Product {
            id: ProductId::new(10),
            restaurant_id: RestaurantId::new(1),
            name: "Marmita".to_owned(),
            description: "Marmita completa do dia".to_owned(),
            category: "Pratos".to_owned(),
            price: price.parse().unwrap(),
            available: true,
        }
    }

    #[test]
    fn priced_item_snapshots_price_and_computes_subtotal() {
        let item = NewOrderItem::priced(&product("12.00"), 3);
        assert_eq!(item.unit_price, "12.00".parse::<Decimal>().unwrap());
        assert_eq!(item.subtotal, "36.00".parse::<Decimal>().unwrap());
        assert_eq!(item.product_name, "Marmita");
    }

    #[test]
    fn subtotal_is_decimal_exact() {
        // 5.50 * 3 must be exactly 16.50, no float drift
        let item = NewOrderItem::priced(&product("5.50"), 3);
        assert_eq!(item.subtotal.to_string(), "16.50");
    }
}
