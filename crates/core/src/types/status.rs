//! Status and role enums.
//!
//! Both enums are stored as text columns and serialized in their
//! `SCREAMING_SNAKE_CASE` wire form (`EM_PREPARO`, `CLIENTE`, ...), matching
//! what clients of the delivery API expect.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of an order.
///
/// The nominal flow is `Criado → Confirmado → EmPreparo → SaiuParaEntrega →
/// Entregue`, with `Cancelado` as an alternate terminal state. Transitions are
/// deliberately unguarded: `updateStatus` overwrites whatever is stored (see
/// DESIGN.md for the rationale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed by the customer, not yet confirmed by the restaurant.
    #[default]
    Criado,
    /// Accepted by the restaurant.
    Confirmado,
    /// Being prepared.
    EmPreparo,
    /// Out for delivery.
    SaiuParaEntrega,
    /// Delivered (terminal).
    Entregue,
    /// Cancelled (terminal).
    Cancelado,
}

impl OrderStatus {
    /// All statuses, in nominal lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Criado,
        Self::Confirmado,
        Self::EmPreparo,
        Self::SaiuParaEntrega,
        Self::Entregue,
        Self::Cancelado,
    ];

    /// Wire/storage form of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Criado => "CRIADO",
            Self::Confirmado => "CONFIRMADO",
            Self::EmPreparo => "EM_PREPARO",
            Self::SaiuParaEntrega => "SAIU_PARA_ENTREGA",
            Self::Entregue => "ENTREGUE",
            Self::Cancelado => "CANCELADO",
        }
    }

    /// Whether this status ends the lifecycle.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Entregue | Self::Cancelado)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an [`OrderStatus`] from its storage form.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown order status: {0}")]
pub struct OrderStatusParseError(pub String);

impl FromStr for OrderStatus {
    type Err = OrderStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CRIADO" => Ok(Self::Criado),
            "CONFIRMADO" => Ok(Self::Confirmado),
            "EM_PREPARO" => Ok(Self::EmPreparo),
            "SAIU_PARA_ENTREGA" => Ok(Self::SaiuParaEntrega),
            "ENTREGUE" => Ok(Self::Entregue),
            "CANCELADO" => Ok(Self::Cancelado),
            other => Err(OrderStatusParseError(other.to_owned())),
        }
    }
}

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// End customer placing orders.
    #[default]
    Cliente,
    /// Restaurant operator; linked to a restaurant record.
    Restaurante,
    /// Back-office administrator.
    Admin,
    /// Delivery courier.
    Entregador,
}

impl UserRole {
    /// Wire/storage form of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cliente => "CLIENTE",
            Self::Restaurante => "RESTAURANTE",
            Self::Admin => "ADMIN",
            Self::Entregador => "ENTREGADOR",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a [`UserRole`] from its storage form.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown user role: {0}")]
pub struct UserRoleParseError(pub String);

impl FromStr for UserRole {
    type Err = UserRoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLIENTE" => Ok(Self::Cliente),
            "RESTAURANTE" => Ok(Self::Restaurante),
            "ADMIN" => Ok(Self::Admin),
            "ENTREGADOR" => Ok(Self::Entregador),
            other => Err(UserRoleParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn status_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::SaiuParaEntrega).unwrap(),
            "\"SAIU_PARA_ENTREGA\""
        );
        let back: OrderStatus = serde_json::from_str("\"EM_PREPARO\"").unwrap();
        assert_eq!(back, OrderStatus::EmPreparo);
    }

    #[test]
    fn terminal_statuses() {
        assert!(OrderStatus::Entregue.is_terminal());
        assert!(OrderStatus::Cancelado.is_terminal());
        assert!(!OrderStatus::Criado.is_terminal());
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("PENDENTE".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn role_round_trips() {
        for role in [
            UserRole::Cliente,
            UserRole::Restaurante,
            UserRole::Admin,
            UserRole::Entregador,
        ] {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), role);
        }
        assert_eq!(
            serde_json::to_string(&UserRole::Entregador).unwrap(),
            "\"ENTREGADOR\""
        );
    }
}
