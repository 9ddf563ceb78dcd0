//! In-memory repository implementations.
//!
//! One shared [`InMemoryStore`] backs all five repository traits so that the
//! cross-entity behavior the schema enforces — FK cascades on delete, unique
//! emails — holds here too. Used by the service and router tests; production
//! always wires Postgres.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use delivery_core::{
    CustomerId, Email, OrderId, OrderItemId, OrderStatus, ProductId, RestaurantId, UserId,
};

use super::{
    CustomerRepository, OrderRepository, ProductRepository, RepositoryError, RestaurantRepository,
    UserRepository,
};
use crate::models::{
    Customer, CustomerPatch, NewCustomer, NewOrder, NewProduct, NewRestaurant, NewUser, Order,
    OrderItem, Product, ProductPatch, Restaurant, RestaurantPatch, User,
};

#[derive(Default)]
struct Tables {
    customers: BTreeMap<i64, Customer>,
    restaurants: BTreeMap<i64, Restaurant>,
    products: BTreeMap<i64, Product>,
    orders: BTreeMap<i64, Order>,
    users: BTreeMap<i64, User>,
}

/// Shared in-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: Arc::default(),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

fn email_taken(tables: &Tables, email: &Email, exclude_customer: Option<CustomerId>) -> bool {
    tables
        .customers
        .values()
        .any(|c| c.email == *email && Some(c.id) != exclude_customer)
}

#[async_trait]
impl CustomerRepository for InMemoryStore {
    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, &new.email, None) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let customer = Customer {
            id: CustomerId::new(self.allocate_id()),
            name: new.name,
            email: new.email,
            phone: new.phone,
            address: new.address,
            active: true,
            created_at: Utc::now(),
        };
        tables.customers.insert(customer.id.as_i64(), customer.clone());
        Ok(customer)
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        Ok(self.tables.read().await.customers.get(&id.as_i64()).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Customer>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .customers
            .values()
            .filter(|c| c.active)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if email_taken(&tables, &patch.email, Some(id)) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        match tables.customers.get_mut(&id.as_i64()) {
            Some(customer) => {
                customer.name = patch.name;
                customer.email = patch.email;
                customer.phone = patch.phone;
                customer.address = patch.address;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_active(&self, id: CustomerId, active: bool) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.customers.get_mut(&id.as_i64()) {
            Some(customer) => {
                customer.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.customers.remove(&id.as_i64()).is_none() {
            return Ok(false);
        }
        // Cascade: the customer's orders (and their items) go with it.
        tables.orders.retain(|_, o| o.customer_id != id);
        Ok(true)
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryStore {
    async fn insert(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let mut tables = self.tables.write().await;
        let restaurant = Restaurant {
            id: RestaurantId::new(self.allocate_id()),
            name: new.name,
            address: new.address,
            category: new.category,
            phone: new.phone,
            opening_hours: new.opening_hours,
            delivery_fee: new.delivery_fee,
            delivery_minutes: new.delivery_minutes,
            active: true,
        };
        tables
            .restaurants
            .insert(restaurant.id.as_i64(), restaurant.clone());
        Ok(restaurant)
    }

    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .restaurants
            .get(&id.as_i64())
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self.tables.read().await.restaurants.values().cloned().collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .restaurants
            .values()
            .filter(|r| r.category == category)
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.restaurants.get_mut(&id.as_i64()) {
            Some(restaurant) => {
                restaurant.name = patch.name;
                restaurant.address = patch.address;
                restaurant.category = patch.category;
                restaurant.phone = patch.phone;
                restaurant.opening_hours = patch.opening_hours;
                restaurant.delivery_fee = patch.delivery_fee;
                restaurant.delivery_minutes = patch.delivery_minutes;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: RestaurantId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.restaurants.remove(&id.as_i64()).is_none() {
            return Ok(false);
        }
        // Cascade: products and orders owned by the restaurant.
        tables.products.retain(|_, p| p.restaurant_id != id);
        tables.orders.retain(|_, o| o.restaurant_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.restaurants.contains_key(&new.restaurant_id.as_i64()) {
            // FK violation surfaces as a database-layer error, as in Postgres.
            return Err(RepositoryError::Conflict(
                "restaurant does not exist".to_owned(),
            ));
        }
        let product = Product {
            id: ProductId::new(self.allocate_id()),
            restaurant_id: new.restaurant_id,
            name: new.name,
            description: new.description,
            category: new.category,
            price: new.price,
            available: true,
        };
        tables.products.insert(product.id.as_i64(), product.clone());
        Ok(product)
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables.read().await.products.get(&id.as_i64()).cloned())
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .products
            .values()
            .filter(|p| p.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&id.as_i64()) {
            Some(product) => {
                product.name = patch.name;
                product.description = patch.description;
                product.category = patch.category;
                product.price = patch.price;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_available(
        &self,
        id: ProductId,
        available: bool,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.products.get_mut(&id.as_i64()) {
            Some(product) => {
                product.available = available;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn insert(&self, new: NewOrder, status: OrderStatus) -> Result<Order, RepositoryError> {
        let mut tables = self.tables.write().await;
        let order_id = OrderId::new(self.allocate_id());
        let items = new
            .items
            .into_iter()
            .map(|item| OrderItem {
                id: OrderItemId::new(self.allocate_id()),
                order_id,
                product_id: item.product_id,
                product_name: item.product_name,
                quantity: item.quantity,
                unit_price: item.unit_price,
                subtotal: item.subtotal,
            })
            .collect();
        let order = Order {
            id: order_id,
            customer_id: new.customer_id,
            restaurant_id: new.restaurant_id,
            delivery_address: new.delivery_address,
            total: new.total,
            status,
            created_at: Utc::now(),
            items,
        };
        tables.orders.insert(order_id.as_i64(), order.clone());
        Ok(order)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables.read().await.orders.get(&id.as_i64()).cloned())
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.customer_id == customer_id)
            .cloned()
            .collect())
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .orders
            .values()
            .filter(|o| o.restaurant_id == restaurant_id)
            .cloned()
            .collect())
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        match tables.orders.get_mut(&id.as_i64()) {
            Some(order) => {
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == new.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        let user = User {
            id: UserId::new(self.allocate_id()),
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            role: new.role,
            active: true,
            restaurant_id: new.restaurant_id,
            created_at: Utc::now(),
        };
        tables.users.insert(user.id.as_i64(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(&id.as_i64()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == *email)
            .cloned())
    }
}
