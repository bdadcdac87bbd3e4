//! `/food/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{FoodItem, FoodItemId, FoodItemPatch, NewFoodItem};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Menu item endpoints.
#[async_trait]
pub trait FoodApi: Send + Sync {
    /// The whole menu.
    async fn list_food(&self) -> Result<Vec<FoodItem>, GatewayError>;

    async fn get_food(&self, id: &FoodItemId) -> Result<FoodItem, GatewayError>;

    /// Create a menu item. Returns the stored item with its new ID.
    async fn add_food(&self, item: &NewFoodItem) -> Result<FoodItem, GatewayError>;

    /// Update a menu item. Returns the fields the backend echoed back.
    async fn update_food(
        &self,
        id: &FoodItemId,
        patch: &FoodItemPatch,
    ) -> Result<FoodItemPatch, GatewayError>;

    async fn delete_food(&self, id: &FoodItemId) -> Result<(), GatewayError>;
}

#[async_trait]
impl FoodApi for Gateway {
    #[instrument(skip(self))]
    async fn list_food(&self) -> Result<Vec<FoodItem>, GatewayError> {
        let url = self.url(&["food", "all"])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(food_item_id = %id))]
    async fn get_food(&self, id: &FoodItemId) -> Result<FoodItem, GatewayError> {
        let url = self.url(&["food", id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self, item), fields(name = %item.name))]
    async fn add_food(&self, item: &NewFoodItem) -> Result<FoodItem, GatewayError> {
        let url = self.url(&["food", "add"])?;
        self.send_json(Method::POST, url, Some(item)).await
    }

    #[instrument(skip(self, patch), fields(food_item_id = %id))]
    async fn update_food(
        &self,
        id: &FoodItemId,
        patch: &FoodItemPatch,
    ) -> Result<FoodItemPatch, GatewayError> {
        let url = self.url(&["food", "update", id.as_str()])?;
        self.send_json(Method::PUT, url, Some(patch)).await
    }

    #[instrument(skip(self), fields(food_item_id = %id))]
    async fn delete_food(&self, id: &FoodItemId) -> Result<(), GatewayError> {
        let url = self.url(&["food", "delete", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }
}
