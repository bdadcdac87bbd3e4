//! Placed orders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderStatus, Price, UserId};

use super::cart::CartItem;

/// A snapshot of a cart at checkout time.
///
/// Immutable once created except for its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(
        default,
        alias = "dateTime",
        with = "crate::types::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|line| line.quantity).sum()
    }

    /// Sum of line totals, for backends that do not send `total`.
    #[must_use]
    pub fn computed_total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Whether the customer may still cancel this order.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.status.can_transition_to(OrderStatus::Cancelled)
    }
}
