//! Restaurant domain types.

use rust_decimal::Decimal;

use delivery_core::RestaurantId;

/// A restaurant offering products for delivery.
#[derive(Debug, Clone)]
pub struct Restaurant {
    /// Unique restaurant ID.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Cuisine category (free text, exact-match filterable).
    pub category: String,
    /// Contact phone number.
    pub phone: String,
    /// Free-text opening hours (e.g. "Seg-Sex 11:00-23:00").
    pub opening_hours: String,
    /// Flat delivery fee, non-negative.
    pub delivery_fee: Decimal,
    /// Estimated delivery time in minutes (10-120).
    pub delivery_minutes: i32,
    /// Whether the restaurant is accepting orders.
    pub active: bool,
}

/// Data for creating a restaurant. `active` starts true.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
    pub category: String,
    pub phone: String,
    pub opening_hours: String,
    pub delivery_fee: Decimal,
    pub delivery_minutes: i32,
}

/// Fields overwritten by a restaurant update.
#[derive(Debug, Clone)]
pub struct RestaurantPatch {
    pub name: String,
    pub address: String,
    pub category: String,
    pub phone: String,
    pub opening_hours: String,
    pub delivery_fee: Decimal,
    pub delivery_minutes: i32,
}
