//! `/users/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{User, UserId, UserPatch};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Self-service account endpoints.
#[async_trait]
pub trait UsersApi: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<User, GatewayError>;

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, GatewayError>;

    async fn delete_account(&self, id: &UserId) -> Result<(), GatewayError>;
}

#[async_trait]
impl UsersApi for Gateway {
    #[instrument(skip(self), fields(user_id = %id))]
    async fn get_user(&self, id: &UserId) -> Result<User, GatewayError> {
        let url = self.url(&["users", id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self, patch), fields(user_id = %id))]
    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, GatewayError> {
        let url = self.url(&["users", "update", id.as_str()])?;
        self.send_json(Method::PUT, url, Some(patch)).await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_account(&self, id: &UserId) -> Result<(), GatewayError> {
        let url = self.url(&["users", "delete", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }
}
