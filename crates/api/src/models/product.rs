//! Product domain types.

use rust_decimal::Decimal;

use delivery_core::{ProductId, RestaurantId};

/// A product on a restaurant's menu.
#[derive(Debug, Clone)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning restaurant (non-null foreign key).
    pub restaurant_id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Longer description.
    pub description: String,
    /// Menu category (free text).
    pub category: String,
    /// Unit price, positive and capped at 500.00.
    pub price: Decimal,
    /// Whether the product can currently be ordered.
    pub available: bool,
}

/// Data for creating a product. The restaurant reference must already be
/// resolved by the caller; `available` starts true.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

/// Fields overwritten by a product update.
///
/// Availability is not part of the patch; it only changes through the
/// explicit availability operation.
#[derive(Debug, Clone)]
pub struct ProductPatch {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}
