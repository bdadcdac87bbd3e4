//! `/payment/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tiffin_core::{OrderId, Payment, PaymentDetails};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Body of a charge: the order plus the payment details, flattened.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeRequest<'a> {
    order_id: &'a OrderId,
    #[serde(flatten)]
    details: &'a PaymentDetails,
}

/// Payment endpoints.
#[async_trait]
pub trait PaymentApi: Send + Sync {
    /// Charge an order. The backend's receipt is not interpreted.
    async fn charge(&self, order_id: &OrderId, details: &PaymentDetails)
    -> Result<(), GatewayError>;

    async fn payment_status(&self, order_id: &OrderId) -> Result<Payment, GatewayError>;
}

#[async_trait]
impl PaymentApi for Gateway {
    #[instrument(skip(self, details), fields(order_id = %order_id, method = %details.method))]
    async fn charge(
        &self,
        order_id: &OrderId,
        details: &PaymentDetails,
    ) -> Result<(), GatewayError> {
        let url = self.url(&["payment", "charge"])?;
        let body = ChargeRequest { order_id, details };
        self.send_empty(Method::POST, url, Some(&body)).await
    }

    #[instrument(skip(self), fields(order_id = %order_id))]
    async fn payment_status(&self, order_id: &OrderId) -> Result<Payment, GatewayError> {
        let url = self.url(&["payment", "status", order_id.as_str()])?;
        self.get_json(url).await
    }
}
