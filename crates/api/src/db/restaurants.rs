//! Restaurant repository.

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use delivery_core::RestaurantId;

use super::RepositoryError;
use crate::models::{NewRestaurant, Restaurant, RestaurantPatch};

/// Retrieval and persistence for restaurants.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Persist a new restaurant, returning it with its generated id.
    async fn insert(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError>;

    /// Look up a restaurant by id.
    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, RepositoryError>;

    /// All restaurants, regardless of the active flag.
    async fn list_all(&self) -> Result<Vec<Restaurant>, RepositoryError>;

    /// Exact-match filter on category.
    async fn find_by_category(&self, category: &str) -> Result<Vec<Restaurant>, RepositoryError>;

    /// Overwrite the patchable fields. Returns `false` if no row matched.
    async fn update(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<bool, RepositoryError>;

    /// Delete a restaurant; products and orders cascade. Returns `false` if
    /// no row matched.
    async fn delete(&self, id: RestaurantId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    address: String,
    category: String,
    phone: String,
    opening_hours: String,
    delivery_fee: Decimal,
    delivery_minutes: i32,
    active: bool,
}

impl From<RestaurantRow> for Restaurant {
    fn from(r: RestaurantRow) -> Self {
        Self {
            id: RestaurantId::new(r.id),
            name: r.name,
            address: r.address,
            category: r.category,
            phone: r.phone,
            opening_hours: r.opening_hours,
            delivery_fee: r.delivery_fee,
            delivery_minutes: r.delivery_minutes,
            active: r.active,
        }
    }
}

const RESTAURANT_COLUMNS: &str =
    "id, name, address, category, phone, opening_hours, delivery_fee, delivery_minutes, active";

/// `PostgreSQL` implementation of [`RestaurantRepository`].
pub struct PgRestaurantRepository {
    pool: PgPool,
}

impl PgRestaurantRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn insert(&self, new: NewRestaurant) -> Result<Restaurant, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            r"
            INSERT INTO restaurants
                (name, address, category, phone, opening_hours, delivery_fee, delivery_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {RESTAURANT_COLUMNS}
            "
        ))
        .bind(&new.name)
        .bind(&new.address)
        .bind(&new.category)
        .bind(&new.phone)
        .bind(&new.opening_hours)
        .bind(new.delivery_fee)
        .bind(new.delivery_minutes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: RestaurantId) -> Result<Option<Restaurant>, RepositoryError> {
        let row = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = $1"
        ))
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Restaurant::from))
    }

    async fn list_all(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn find_by_category(&self, category: &str) -> Result<Vec<Restaurant>, RepositoryError> {
        let rows = sqlx::query_as::<_, RestaurantRow>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE category = $1 ORDER BY id"
        ))
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Restaurant::from).collect())
    }

    async fn update(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE restaurants
            SET name = $1, address = $2, category = $3, phone = $4,
                opening_hours = $5, delivery_fee = $6, delivery_minutes = $7
            WHERE id = $8
            ",
        )
        .bind(&patch.name)
        .bind(&patch.address)
        .bind(&patch.category)
        .bind(&patch.phone)
        .bind(&patch.opening_hours)
        .bind(patch.delivery_fee)
        .bind(patch.delivery_minutes)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: RestaurantId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
