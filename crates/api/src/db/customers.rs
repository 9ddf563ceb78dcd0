//! Customer repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use delivery_core::{CustomerId, Email};

use super::RepositoryError;
use crate::models::{Customer, CustomerPatch, NewCustomer};

/// Key-based and filtered retrieval plus persistence for customers.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Persist a new customer, returning it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError>;

    /// Look up a customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError>;

    /// All customers with the active flag set.
    async fn list_active(&self) -> Result<Vec<Customer>, RepositoryError>;

    /// Overwrite name/email/phone/address of an existing customer.
    ///
    /// Returns `false` if no row matched the id.
    async fn update(&self, id: CustomerId, patch: CustomerPatch)
    -> Result<bool, RepositoryError>;

    /// Set the active flag. Returns `false` if no row matched the id.
    async fn set_active(&self, id: CustomerId, active: bool) -> Result<bool, RepositoryError>;

    /// Delete a customer; orders cascade. Returns `false` if no row matched.
    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError>;
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    email: String,
    phone: String,
    address: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(r: CustomerRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(Self {
            id: CustomerId::new(r.id),
            name: r.name,
            email,
            phone: r.phone,
            address: r.address,
            active: r.active,
            created_at: r.created_at,
        })
    }
}

/// `PostgreSQL` implementation of [`CustomerRepository`].
pub struct PgCustomerRepository {
    pool: PgPool,
}

impl PgCustomerRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerRepository for PgCustomerRepository {
    async fn insert(&self, new: NewCustomer) -> Result<Customer, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO customers (name, email, phone, address)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, email, phone, address, active, created_at
            ",
        )
        .bind(&new.name)
        .bind(new.email.as_str())
        .bind(&new.phone)
        .bind(&new.address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_unique_violation(e, "email already exists"))?;

        row.try_into()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, phone, address, active, created_at
            FROM customers
            WHERE id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    async fn list_active(&self) -> Result<Vec<Customer>, RepositoryError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, name, email, phone, address, active, created_at
            FROM customers
            WHERE active = TRUE
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Customer::try_from).collect()
    }

    async fn update(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE customers
            SET name = $1, email = $2, phone = $3, address = $4
            WHERE id = $5
            ",
        )
        .bind(&patch.name)
        .bind(patch.email.as_str())
        .bind(&patch.phone)
        .bind(&patch.address)
        .bind(id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(|e| super::map_unique_violation(e, "email already exists"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: CustomerId, active: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE customers SET active = $1 WHERE id = $2")
            .bind(active)
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: CustomerId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
