//! `/admin/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{User, UserId};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// User administration endpoints.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Every registered user, admins included.
    async fn all_users(&self) -> Result<Vec<User>, GatewayError>;

    async fn delete_user(&self, id: &UserId) -> Result<(), GatewayError>;
}

#[async_trait]
impl AdminApi for Gateway {
    #[instrument(skip(self))]
    async fn all_users(&self) -> Result<Vec<User>, GatewayError> {
        let url = self.url(&["admin", "users", "all"])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(user_id = %id))]
    async fn delete_user(&self, id: &UserId) -> Result<(), GatewayError> {
        let url = self.url(&["admin", "user", "delete", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }
}
