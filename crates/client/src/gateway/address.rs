//! `/address/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{Address, NewAddress, UserId};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Delivery address endpoints.
#[async_trait]
pub trait AddressApi: Send + Sync {
    async fn addresses(&self, user_id: &UserId) -> Result<Vec<Address>, GatewayError>;

    async fn add_address(&self, address: &NewAddress) -> Result<Address, GatewayError>;
}

#[async_trait]
impl AddressApi for Gateway {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn addresses(&self, user_id: &UserId) -> Result<Vec<Address>, GatewayError> {
        let url = self.url(&["address", user_id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self, address), fields(user_id = %address.user_id))]
    async fn add_address(&self, address: &NewAddress) -> Result<Address, GatewayError> {
        let url = self.url(&["address", "add"])?;
        self.send_json(Method::POST, url, Some(address)).await
    }
}
