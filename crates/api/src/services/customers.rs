//! Customer service.

use std::sync::Arc;

use delivery_core::CustomerId;

use super::DomainError;
use crate::db::CustomerRepository;
use crate::models::{Customer, CustomerPatch, NewCustomer};

/// Registration, lookup, and lifecycle operations for customers.
#[derive(Clone)]
pub struct CustomerService {
    repo: Arc<dyn CustomerRepository>,
}

impl CustomerService {
    /// Create a new service over a repository.
    #[must_use]
    pub fn new(repo: Arc<dyn CustomerRepository>) -> Self {
        Self { repo }
    }

    /// Register a customer. Uniqueness of the email is left to the storage
    /// constraint; no pre-check here.
    ///
    /// # Errors
    ///
    /// Propagates repository failures (including the email conflict).
    pub async fn register(&self, new: NewCustomer) -> Result<Customer, DomainError> {
        let customer = self.repo.insert(new).await?;
        tracing::info!(customer_id = %customer.id, "customer registered");
        Ok(customer)
    }

    /// Look up a customer by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no customer has this id.
    pub async fn find_by_id(&self, id: CustomerId) -> Result<Customer, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Customer", id.as_i64()))
    }

    /// All customers with the active flag set.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list_active(&self) -> Result<Vec<Customer>, DomainError> {
        Ok(self.repo.list_active().await?)
    }

    /// Overwrite name/email/phone/address and return the updated customer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no customer has this id.
    pub async fn update(
        &self,
        id: CustomerId,
        patch: CustomerPatch,
    ) -> Result<Customer, DomainError> {
        // Re-fetch first so a miss surfaces as the domain NotFound.
        self.find_by_id(id).await?;
        self.repo.update(id, patch).await?;
        self.find_by_id(id).await
    }

    /// Flip the active flag.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no customer has this id.
    pub async fn toggle_active(&self, id: CustomerId) -> Result<(), DomainError> {
        let customer = self.find_by_id(id).await?;
        self.repo.set_active(id, !customer.active).await?;
        tracing::info!(customer_id = %id, active = !customer.active, "customer toggled");
        Ok(())
    }

    /// Delete a customer; their orders cascade away with them.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no customer has this id.
    pub async fn delete(&self, id: CustomerId) -> Result<(), DomainError> {
        if !self.repo.delete(id).await? {
            return Err(DomainError::not_found("Customer", id.as_i64()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delivery_core::Email;

    use crate::db::Repositories;

    fn service() -> CustomerService {
        CustomerService::new(Repositories::in_memory().customers)
    }

    fn new_customer(email: &str) -> NewCustomer {
        NewCustomer {
            name: "João da Silva".to_owned(),
            email: Email::parse(email).unwrap(),
            phone: "11912345678".to_owned(),
            address: "Rua das Flores, 10".to_owned(),
        }
    }

    #[tokio::test]
    async fn register_returns_generated_id_and_submitted_fields() {
        let service = service();
        let customer = service.register(new_customer("joao@example.com")).await.unwrap();

        assert!(customer.id.as_i64() > 0);
        assert_eq!(customer.name, "João da Silva");
        assert_eq!(customer.email.as_str(), "joao@example.com");
        assert!(customer.active);
    }

    #[tokio::test]
    async fn find_by_id_misses_with_not_found() {
        let service = service();
        let err = service.find_by_id(CustomerId::new(404)).await.unwrap_err();
        assert!(
            matches!(err, DomainError::NotFound { entity: "Customer", id: 404 }),
            "got {err:?}"
        );
        assert_eq!(err.to_string(), "Customer not found with id 404");
    }

    #[tokio::test]
    async fn list_active_excludes_deactivated() {
        let service = service();
        let a = service.register(new_customer("a@example.com")).await.unwrap();
        let b = service.register(new_customer("b@example.com")).await.unwrap();
        service.toggle_active(a.id).await.unwrap();

        let active = service.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active.first().map(|c| c.id), Some(b.id));
    }

    #[tokio::test]
    async fn toggle_twice_round_trips() {
        let service = service();
        let customer = service.register(new_customer("c@example.com")).await.unwrap();
        assert!(customer.active);

        service.toggle_active(customer.id).await.unwrap();
        assert!(!service.find_by_id(customer.id).await.unwrap().active);

        service.toggle_active(customer.id).await.unwrap();
        assert!(service.find_by_id(customer.id).await.unwrap().active);
    }

    #[tokio::test]
    async fn update_overwrites_contact_fields() {
        let service = service();
        let customer = service.register(new_customer("d@example.com")).await.unwrap();

        let updated = service
            .update(
                customer.id,
                CustomerPatch {
                    name: "Maria".to_owned(),
                    email: Email::parse("maria@example.com").unwrap(),
                    phone: "11987654321".to_owned(),
                    address: "Av. Paulista, 1000".to_owned(),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, customer.id);
        assert_eq!(updated.name, "Maria");
        assert_eq!(updated.email.as_str(), "maria@example.com");
        // Toggle state and creation timestamp survive updates.
        assert!(updated.active);
        assert_eq!(updated.created_at, customer.created_at);
    }

    #[tokio::test]
    async fn update_on_unknown_id_is_not_found() {
        let service = service();
        let err = service
            .update(
                CustomerId::new(77),
                CustomerPatch {
                    name: "x".to_owned(),
                    email: Email::parse("x@example.com").unwrap(),
                    phone: "123456789".to_owned(),
                    address: "y".to_owned(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Customer", .. }));
    }
}
