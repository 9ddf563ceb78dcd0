//! Domain models.
//!
//! These are validated domain objects, separate from the boundary DTOs in
//! `routes/` and from whatever row shapes the repositories read. Each entity
//! has a persisted form (with generated id) and a `New*` form used on insert.

pub mod customer;
pub mod order;
pub mod product;
pub mod restaurant;
pub mod user;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use order::{DeliveryAddress, NewOrder, NewOrderItem, Order, OrderItem};
pub use product::{NewProduct, Product, ProductPatch};
pub use restaurant::{NewRestaurant, Restaurant, RestaurantPatch};
pub use user::{NewUser, User};
