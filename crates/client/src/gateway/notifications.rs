//! `/notifications/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tiffin_core::UserId;
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendNotification<'a> {
    user_id: &'a UserId,
    message: &'a str,
}

/// Notification endpoints.
#[async_trait]
pub trait NotificationsApi: Send + Sync {
    async fn send_notification(&self, user_id: &UserId, message: &str)
    -> Result<(), GatewayError>;
}

#[async_trait]
impl NotificationsApi for Gateway {
    #[instrument(skip(self, message), fields(user_id = %user_id))]
    async fn send_notification(
        &self,
        user_id: &UserId,
        message: &str,
    ) -> Result<(), GatewayError> {
        let url = self.url(&["notifications", "send"])?;
        self.send_empty(Method::POST, url, Some(&SendNotification { user_id, message }))
            .await
    }
}
