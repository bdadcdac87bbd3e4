//! `/orders/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tiffin_core::{Order, OrderId, OrderStatus, UserId};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Body of a status change.
#[derive(Debug, Serialize)]
struct StatusUpdate {
    status: OrderStatus,
}

/// Order endpoints.
#[async_trait]
pub trait OrdersApi: Send + Sync {
    /// Every order in the system (admin).
    async fn all_orders(&self) -> Result<Vec<Order>, GatewayError>;

    async fn get_order(&self, id: &OrderId) -> Result<Order, GatewayError>;

    async fn user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, GatewayError>;

    /// Turn the user's server-side cart into an order.
    async fn place_order(&self, user_id: &UserId) -> Result<Order, GatewayError>;

    async fn cancel_order(&self, id: &OrderId) -> Result<(), GatewayError>;

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), GatewayError>;
}

#[async_trait]
impl OrdersApi for Gateway {
    #[instrument(skip(self))]
    async fn all_orders(&self) -> Result<Vec<Order>, GatewayError> {
        let url = self.url(&["orders"])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn get_order(&self, id: &OrderId) -> Result<Order, GatewayError> {
        let url = self.url(&["orders", id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, GatewayError> {
        let url = self.url(&["orders", "user", user_id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn place_order(&self, user_id: &UserId) -> Result<Order, GatewayError> {
        let url = self.url(&["orders", "place", user_id.as_str()])?;
        self.call_json(Method::POST, url).await
    }

    #[instrument(skip(self), fields(order_id = %id))]
    async fn cancel_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        let url = self.url(&["orders", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }

    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), GatewayError> {
        let url = self.url(&["orders", id.as_str(), "status"])?;
        self.send_empty(Method::PUT, url, Some(&StatusUpdate { status }))
            .await
    }
}
