//! Customer domain types.

use chrono::{DateTime, Utc};

use delivery_core::{CustomerId, Email};

/// A registered customer.
#[derive(Debug, Clone)]
pub struct Customer {
    /// Unique customer ID.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Email address (unique at the storage level).
    pub email: Email,
    /// Contact phone number.
    pub phone: String,
    /// Free-text home address.
    pub address: String,
    /// Whether the customer can place orders.
    pub active: bool,
    /// When the customer registered.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a customer. The id and timestamp are generated on insert;
/// `active` starts true.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}

/// Fields overwritten by a customer update.
///
/// The active flag and creation timestamp are never touched by updates; the
/// flag only changes through the explicit toggle operation.
#[derive(Debug, Clone)]
pub struct CustomerPatch {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub address: String,
}
