//! `/categories/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{Category, CategoryId, CategoryPatch, NewCategory};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Menu category endpoints.
#[async_trait]
pub trait CategoriesApi: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError>;

    async fn add_category(&self, category: &NewCategory) -> Result<Category, GatewayError>;

    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, GatewayError>;

    async fn delete_category(&self, id: &CategoryId) -> Result<(), GatewayError>;
}

#[async_trait]
impl CategoriesApi for Gateway {
    #[instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        let url = self.url(&["categories", "all"])?;
        self.get_json(url).await
    }

    #[instrument(skip(self, category), fields(name = %category.name))]
    async fn add_category(&self, category: &NewCategory) -> Result<Category, GatewayError> {
        let url = self.url(&["categories", "add"])?;
        self.send_json(Method::POST, url, Some(category)).await
    }

    #[instrument(skip(self, patch), fields(category_id = %id))]
    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, GatewayError> {
        let url = self.url(&["categories", "update", id.as_str()])?;
        self.send_json(Method::PUT, url, Some(patch)).await
    }

    #[instrument(skip(self), fields(category_id = %id))]
    async fn delete_category(&self, id: &CategoryId) -> Result<(), GatewayError> {
        let url = self.url(&["categories", "delete", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }
}
