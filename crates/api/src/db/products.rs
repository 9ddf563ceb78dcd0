//! Product repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use delivery_core::{ProductId, RestaurantId};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductPatch};

/// Retrieval and persistence for products.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Persist a new product, returning it with its generated id.
    ///
    /// The restaurant reference must exist; a missing FK surfaces as a
    /// database error, not a domain NotFound (callers resolve the restaurant
    /// first).
    async fn insert(&self, new: NewProduct) -> Result<Product, RepositoryError>;

    /// Look up a product by id.
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError>;

    /// All products owned by a restaurant.
    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Overwrite name/description/category/price. Returns `false` if no row
    /// matched.
    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<bool, RepositoryError>;

    /// Set the availability flag. Returns `false` if no row matched.
    async fn set_available(&self, id: ProductId, available: bool)
    -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: String,
    category: String,
    price: Decimal,
    available: bool,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Self {
            id: ProductId::new(r.id),
            restaurant_id: RestaurantId::new(r.restaurant_id),
            name: r.name,
            description: r.description,
            category: r.category,
            price: r.price,
            available: r.available,
        }
    }
}

const PRODUCT_COLUMNS: &str =
    "id, restaurant_id, name, description, category, price, available";

/// `PostgreSQL` implementation of [`ProductRepository`].
pub struct PgProductRepository {
    pool: PgPool,
}

impl PgProductRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn insert(&self, new: NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            r"
            INSERT INTO products (restaurant_id, name, description, category, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(new.restaurant_id.as_i64())
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.category)
        .bind(new.price)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE restaurant_id = $1 ORDER BY id"
        ))
        .bind(restaurant_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE products
            SET name = $1, description = $2, category = $3, price = $4
            WHERE id = $5
            ",
        )
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(&patch.category)
        .bind(patch.price)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_available(
        &self,
        id: ProductId,
        available: bool,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE products SET available = $1 WHERE id = $2")
            .bind(available)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
