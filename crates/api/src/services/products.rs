//! Product service with a read-through lookup cache.
//!
//! `find_by_id` consults a bounded moka cache before the repository. The
//! cache is a best-effort convenience, not a correctness mechanism; the
//! invalidation points mirror the mutations exactly: registering a product
//! clears the whole cache, updating or toggling availability evicts that
//! product's key.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;

use delivery_core::{ProductId, RestaurantId};

use super::DomainError;
use crate::db::ProductRepository;
use crate::models::{NewProduct, Product, ProductPatch};

/// Cache bounds: plenty for a menu catalog, small enough to stay harmless.
const CACHE_CAPACITY: u64 = 1000;
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Registration, lookup, and update operations for products.
#[derive(Clone)]
pub struct ProductService {
    repo: Arc<dyn ProductRepository>,
    cache: Cache<ProductId, Product>,
}

impl ProductService {
    /// Create a new service over a repository.
    #[must_use]
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        let cache = Cache::builder()
            .max_capacity(CACHE_CAPACITY)
            .time_to_live(CACHE_TTL)
            .build();
        Self { repo, cache }
    }

    /// Register a product. The restaurant reference must already be resolved
    /// by the caller. Clears the whole lookup cache.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn register(&self, new: NewProduct) -> Result<Product, DomainError> {
        let product = self.repo.insert(new).await?;
        self.cache.invalidate_all();
        tracing::info!(product_id = %product.id, "product registered, cache cleared");
        Ok(product)
    }

    /// Look up a product by id, consulting the cache first.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no product has this id.
    pub async fn find_by_id(&self, id: ProductId) -> Result<Product, DomainError> {
        if let Some(hit) = self.cache.get(&id).await {
            return Ok(hit);
        }
        tracing::debug!(product_id = %id, "product cache miss");
        let product = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Product", id.as_i64()))?;
        self.cache.insert(id, product.clone()).await;
        Ok(product)
    }

    /// All products owned by a restaurant. Not cached.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn find_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Product>, DomainError> {
        Ok(self.repo.find_by_restaurant(restaurant_id).await?)
    }

    /// Overwrite name/description/category/price, evict the cached entry,
    /// and return the updated product.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no product has this id.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product, DomainError> {
        self.find_by_id(id).await?;
        self.repo.update(id, patch).await?;
        self.cache.invalidate(&id).await;
        self.find_by_id(id).await
    }

    /// Set the availability flag and evict the cached entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no product has this id.
    pub async fn set_availability(&self, id: ProductId, available: bool) -> Result<(), DomainError> {
        self.find_by_id(id).await?;
        self.repo.set_available(id, available).await?;
        self.cache.invalidate(&id).await;
        Ok(())
    }

    /// Drop every cached product. Called after bulk changes outside this
    /// service, such as a restaurant cascade delete.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
