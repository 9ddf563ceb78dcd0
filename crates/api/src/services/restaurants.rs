//! Restaurant service.

use std::sync::Arc;

use delivery_core::RestaurantId;

use super::DomainError;
use crate::db::RestaurantRepository;
use crate::models::{NewRestaurant, Restaurant, RestaurantPatch};

/// Registration, lookup, and update operations for restaurants.
#[derive(Clone)]
pub struct RestaurantService {
    repo: Arc<dyn RestaurantRepository>,
}

impl RestaurantService {
    /// Create a new service over a repository.
    #[must_use]
    pub fn new(repo: Arc<dyn RestaurantRepository>) -> Self {
        Self { repo }
    }

    /// Register a restaurant as-is.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn register(&self, new: NewRestaurant) -> Result<Restaurant, DomainError> {
        let restaurant = self.repo.insert(new).await?;
        tracing::info!(restaurant_id = %restaurant.id, "restaurant registered");
        Ok(restaurant)
    }

    /// Look up a restaurant by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no restaurant has this id.
    pub async fn find_by_id(&self, id: RestaurantId) -> Result<Restaurant, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Restaurant", id.as_i64()))
    }

    /// All restaurants, active or not.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list_all(&self) -> Result<Vec<Restaurant>, DomainError> {
        Ok(self.repo.list_all().await?)
    }

    /// Exact-match filter on category.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn find_by_category(&self, category: &str) -> Result<Vec<Restaurant>, DomainError> {
        Ok(self.repo.find_by_category(category).await?)
    }

    /// Overwrite the patchable fields and return the updated restaurant.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no restaurant has this id.
    pub async fn update(
        &self,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<Restaurant, DomainError> {
        self.find_by_id(id).await?;
        self.repo.update(id, patch).await?;
        self.find_by_id(id).await
    }

    /// Delete a restaurant; products and orders cascade away with it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no restaurant has this id.
    pub async fn delete(&self, id: RestaurantId) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("Restaurant", id.as_i64()));
        }
        tracing::info!(restaurant_id = %id, "restaurant deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::db::Repositories;

    fn service() -> RestaurantService {
        RestaurantService::new(Repositories::in_memory().restaurants)
    }

    fn new_restaurant(name: &str, category: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.to_owned(),
            address: "Rua A, 100".to_owned(),
            category: category.to_owned(),
            phone: "11987654321".to_owned(),
            opening_hours: "Seg-Dom 11:00-23:00".to_owned(),
            delivery_fee: "5.50".parse().unwrap(),
            delivery_minutes: 45,
        }
    }

    #[tokio::test]
    async fn register_assigns_id_and_defaults_active() {
        let service = service();
        let restaurant = service
            .register(new_restaurant("Cantina", "Italiana"))
            .await
            .unwrap();
        assert!(restaurant.id.as_i64() > 0);
        assert!(restaurant.active);
        assert_eq!(restaurant.delivery_minutes, 45);
    }

    #[tokio::test]
    async fn category_filter_is_exact_match() {
        let service = service();
        service.register(new_restaurant("A", "Italiana")).await.unwrap();
        service.register(new_restaurant("B", "Japonesa")).await.unwrap();
        service.register(new_restaurant("C", "Italiana")).await.unwrap();

        let italians = service.find_by_category("Italiana").await.unwrap();
        assert_eq!(italians.len(), 2);
        // No prefix/substring matching.
        assert!(service.find_by_category("Ital").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_includes_every_restaurant() {
        let service = service();
        service.register(new_restaurant("A", "Italiana")).await.unwrap();
        service.register(new_restaurant("B", "Japonesa")).await.unwrap();
        assert_eq!(service.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_misses_with_not_found() {
        let service = service();
        let err = service
            .update(
                RestaurantId::new(9),
                RestaurantPatch {
                    name: "x".to_owned(),
                    address: "y".to_owned(),
                    category: "z".to_owned(),
                    phone: "1234567890".to_owned(),
                    opening_hours: "sempre".to_owned(),
                    delivery_fee: "0".parse().unwrap(),
                    delivery_minutes: 30,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Restaurant not found with id 9");
    }
}
