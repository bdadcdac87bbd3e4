//! `/cart/*` calls.
//!
//! Add and remove take their arguments as query parameters, not a body.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{CartItem, FoodItemId, UserId};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Per-user cart endpoints.
#[async_trait]
pub trait CartApi: Send + Sync {
    async fn cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, GatewayError>;

    /// Add one unit of a food item.
    async fn add_to_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError>;

    /// Remove a food item's line from the cart.
    async fn remove_from_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError>;

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), GatewayError>;
}

#[async_trait]
impl CartApi for Gateway {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, GatewayError> {
        let url = self.url(&["cart", "items", user_id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(skip(self), fields(user_id = %user_id, food_item_id = %food_item_id))]
    async fn add_to_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError> {
        let url = self.url_with_query(
            &["cart", "add"],
            &[
                ("userId", user_id.as_str()),
                ("foodItemId", food_item_id.as_str()),
            ],
        )?;
        self.call(Method::POST, url).await
    }

    #[instrument(skip(self), fields(user_id = %user_id, food_item_id = %food_item_id))]
    async fn remove_from_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError> {
        let url = self.url_with_query(
            &["cart", "remove"],
            &[
                ("userId", user_id.as_str()),
                ("foodItemId", food_item_id.as_str()),
            ],
        )?;
        self.call(Method::POST, url).await
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn clear_cart(&self, user_id: &UserId) -> Result<(), GatewayError> {
        let url = self.url(&["cart", "clear", user_id.as_str()])?;
        self.call(Method::POST, url).await
    }
}
