//! Order service — the order lifecycle.
//!
//! Order *assembly* (resolving customer, restaurant, and products, snapshotting
//! prices, summing subtotals) happens at the boundary in `routes/orders.rs`;
//! this service receives a fully-resolved [`NewOrder`] and owns persistence
//! and the status lifecycle.
//!
//! Status transitions are intentionally unguarded: `update_status` overwrites
//! whatever is stored, and `cancel` succeeds from any prior state, terminal
//! ones included. See DESIGN.md before "fixing" this.

use std::sync::Arc;

use delivery_core::{CustomerId, OrderId, OrderStatus, RestaurantId};

use super::DomainError;
use crate::db::OrderRepository;
use crate::models::{NewOrder, Order};

/// Creation, lookup, and status operations for orders.
#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    /// Create a new service over a repository.
    #[must_use]
    pub fn new(repo: Arc<dyn OrderRepository>) -> Self {
        Self { repo }
    }

    /// Persist a resolved order. Status always starts at `CRIADO`, whatever
    /// the caller assembled.
    ///
    /// # Errors
    ///
    /// Propagates repository failures. Order and items persist atomically;
    /// nothing is stored on failure.
    pub async fn create(&self, new: NewOrder) -> Result<Order, DomainError> {
        let order = self.repo.insert(new, OrderStatus::Criado).await?;
        tracing::info!(order_id = %order.id, total = %order.total, "order created");
        Ok(order)
    }

    /// Look up an order (with items) by id.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no order has this id.
    pub async fn find_by_id(&self, id: OrderId) -> Result<Order, DomainError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Order", id.as_i64()))
    }

    /// All orders placed by a customer, any status.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Vec<Order>, DomainError> {
        Ok(self.repo.list_by_customer(customer_id).await?)
    }

    /// All orders received by a restaurant, any status.
    ///
    /// # Errors
    ///
    /// Propagates repository failures.
    pub async fn list_by_restaurant(
        &self,
        restaurant_id: RestaurantId,
    ) -> Result<Vec<Order>, DomainError> {
        Ok(self.repo.list_by_restaurant(restaurant_id).await?)
    }

    /// Overwrite the status unconditionally and return the updated order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no order has this id.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, DomainError> {
        let mut order = self.find_by_id(id).await?;
        self.repo.set_status(id, status).await?;
        order.status = status;
        tracing::info!(order_id = %id, status = %status, "order status updated");
        Ok(order)
    }

    /// Force the status to `CANCELADO`, whatever the prior state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no order has this id.
    pub async fn cancel(&self, id: OrderId) -> Result<(), DomainError> {
        self.find_by_id(id).await?;
        self.repo.set_status(id, OrderStatus::Cancelado).await?;
        tracing::info!(order_id = %id, "order cancelled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    use delivery_core::ProductId;

    use crate::db::Repositories;
    use crate::models::{DeliveryAddress, NewOrderItem};

    fn address() -> DeliveryAddress {
        DeliveryAddress {
            street: "Rua das Flores".to_owned(),
            number: "10".to_owned(),
            neighborhood: "Centro".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
            postal_code: "01000-000".to_owned(),
            complement: Some("Apto 42".to_owned()),
        }
    }

    fn item(product_id: i64, price: &str, quantity: i32) -> NewOrderItem {
        let unit_price: Decimal = price.parse().unwrap();
        NewOrderItem {
            product_id: ProductId::new(product_id),
            product_name: format!("Produto {product_id}"),
            quantity,
            unit_price,
            subtotal: unit_price * Decimal::from(quantity),
        }
    }

    fn new_order(items: Vec<NewOrderItem>) -> NewOrder {
        let total = items.iter().map(|i| i.subtotal).sum();
        NewOrder {
            customer_id: CustomerId::new(1),
            restaurant_id: RestaurantId::new(2),
            delivery_address: address(),
            total,
            items,
        }
    }

    fn service() -> OrderService {
        OrderService::new(Repositories::in_memory().orders)
    }

    #[tokio::test]
    async fn create_forces_status_criado_and_keeps_totals() {
        let service = service();
        let order = service
            .create(new_order(vec![item(1, "10.00", 2), item(2, "5.50", 1)]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Criado);
        assert_eq!(order.total, "25.50".parse::<Decimal>().unwrap());
        assert_eq!(order.items.len(), 2);
        let subtotals: Vec<String> = order.items.iter().map(|i| i.subtotal.to_string()).collect();
        assert_eq!(subtotals, vec!["20.00", "5.50"]);
    }

    #[tokio::test]
    async fn find_by_id_misses_with_not_found() {
        let service = service();
        let err = service.find_by_id(OrderId::new(55)).await.unwrap_err();
        assert_eq!(err.to_string(), "Order not found with id 55");
    }

    #[tokio::test]
    async fn update_status_overwrites_unconditionally() {
        let service = service();
        let order = service
            .create(new_order(vec![item(1, "10.00", 1)]))
            .await
            .unwrap();

        // Forward through the lifecycle...
        for status in [
            OrderStatus::Confirmado,
            OrderStatus::EmPreparo,
            OrderStatus::SaiuParaEntrega,
            OrderStatus::Entregue,
        ] {
            let updated = service.update_status(order.id, status).await.unwrap();
            assert_eq!(updated.status, status);
        }

        // ...and backwards, which the permissive model allows.
        let rewound = service
            .update_status(order.id, OrderStatus::Criado)
            .await
            .unwrap();
        assert_eq!(rewound.status, OrderStatus::Criado);
    }

    #[tokio::test]
    async fn cancel_wins_from_any_prior_status() {
        let service = service();
        for prior in OrderStatus::ALL {
            let order = service
                .create(new_order(vec![item(1, "10.00", 1)]))
                .await
                .unwrap();
            service.update_status(order.id, prior).await.unwrap();

            service.cancel(order.id).await.unwrap();
            let found = service.find_by_id(order.id).await.unwrap();
            assert_eq!(found.status, OrderStatus::Cancelado, "prior was {prior}");
        }
    }

    #[tokio::test]
    async fn lists_are_scoped_but_not_status_filtered() {
        let service = service();
        let order = service
            .create(new_order(vec![item(1, "10.00", 1)]))
            .await
            .unwrap();
        service.cancel(order.id).await.unwrap();

        // Cancelled orders still show up in both listings.
        assert_eq!(
            service.list_by_customer(order.customer_id).await.unwrap().len(),
            1
        );
        assert_eq!(
            service
                .list_by_restaurant(order.restaurant_id)
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(service
            .list_by_customer(CustomerId::new(999))
            .await
            .unwrap()
            .is_empty());
    }
}
