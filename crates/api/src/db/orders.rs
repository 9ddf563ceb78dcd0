//! Order repository.
//!
//! Orders and their items are written in a single transaction: a failed item
//! insert leaves no partial order behind. The delivery address is embedded in
//! the order row (flattened columns), not a standalone entity.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use delivery_core::{CustomerId, OrderId, OrderItemId, OrderStatus, ProductId, RestaurantId};

use super::RepositoryError;
use crate::models::{DeliveryAddress, NewOrder, Order, OrderItem};

/// Retrieval and persistence for orders.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persist an order and its items atomically, returning the stored order
    /// with generated ids.
    async fn insert(&self, new: NewOrder, status: OrderStatus) -> Result<Order, RepositoryError>;

    /// Look up an order (with items) by id.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError>;

    /// All orders placed by a customer, regardless of status.
    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// All orders received by a restaurant, regardless of status.
    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError>;

    /// Overwrite the status unconditionally. Returns `false` if no row
    /// matched.
    async fn set_status(&self, id: OrderId, status: OrderStatus)
    -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i64,
    customer_id: i64,
    restaurant_id: i64,
    street: String,
    number: String,
    neighborhood: String,
    city: String,
    state: String,
    postal_code: String,
    complement: Option<String>,
    total: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(r.id),
            order_id: OrderId::new(r.order_id),
            product_id: ProductId::new(r.product_id),
            product_name: r.product_name,
            quantity: r.quantity,
            unit_price: r.unit_price,
            subtotal: r.subtotal,
        }
    }
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status: OrderStatus = self.status.parse().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        Ok(Order {
            id: OrderId::new(self.id),
            customer_id: CustomerId::new(self.customer_id),
            restaurant_id: RestaurantId::new(self.restaurant_id),
            delivery_address: DeliveryAddress {
                street: self.street,
                number: self.number,
                neighborhood: self.neighborhood,
                city: self.city,
                state: self.state,
                postal_code: self.postal_code,
                complement: self.complement,
            },
            total: self.total,
            status,
            created_at: self.created_at,
            items,
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_id, restaurant_id, street, number, neighborhood, \
     city, state, postal_code, complement, total, status, created_at";

const ITEM_COLUMNS: &str =
    "id, order_id, product_id, product_name, quantity, unit_price, subtotal";

/// `PostgreSQL` implementation of [`OrderRepository`].
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn load_many(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.load_items(row.id).await?;
            orders.push(row.into_order(items)?);
        }
        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for PgOrderRepository {
    async fn insert(&self, new: NewOrder, status: OrderStatus) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders
                (customer_id, restaurant_id, street, number, neighborhood,
                 city, state, postal_code, complement, total, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(new.customer_id.as_i64())
        .bind(new.restaurant_id.as_i64())
        .bind(&new.delivery_address.street)
        .bind(&new.delivery_address.number)
        .bind(&new.delivery_address.neighborhood)
        .bind(&new.delivery_address.city)
        .bind(&new.delivery_address.state)
        .bind(&new.delivery_address.postal_code)
        .bind(&new.delivery_address.complement)
        .bind(new.total)
        .bind(status.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(new.items.len());
        for item in &new.items {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                r"
                INSERT INTO order_items
                    (order_id, product_id, product_name, quantity, unit_price, subtotal)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {ITEM_COLUMNS}
                "
            ))
            .bind(order_row.id)
            .bind(item.product_id.as_i64())
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .fetch_one(&mut *tx)
            .await?;

            items.push(item_row.into());
        }

        tx.commit().await?;

        order_row.into_order(items)
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let items = self.load_items(row.id).await?;
                Ok(Some(row.into_order(items)?))
            }
            None => Ok(None),
        }
    }

    async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE customer_id = $1 ORDER BY id"
        ))
        .bind(customer_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        self.load_many(rows).await
    }

    async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE restaurant_id = $1 ORDER BY id"
        ))
        .bind(restaurant_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        self.load_many(rows).await
    }

    async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE orders SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
