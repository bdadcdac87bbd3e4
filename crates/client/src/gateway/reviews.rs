//! `/reviews/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{FoodItemId, NewReview, Review, ReviewId};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Review endpoints.
#[async_trait]
pub trait ReviewsApi: Send + Sync {
    async fn reviews_for(&self, food_item_id: &FoodItemId) -> Result<Vec<Review>, GatewayError>;

    async fn add_review(&self, review: &NewReview) -> Result<(), GatewayError>;

    async fn delete_review(&self, id: &ReviewId) -> Result<(), GatewayError>;
}

#[async_trait]
impl ReviewsApi for Gateway {
    #[instrument(skip(self), fields(food_item_id = %food_item_id))]
    async fn reviews_for(&self, food_item_id: &FoodItemId) -> Result<Vec<Review>, GatewayError> {
        let url = self.url(&["reviews", food_item_id.as_str()])?;
        self.get_json(url).await
    }

    #[instrument(
        skip(self, review),
        fields(food_item_id = %review.food_item_id, rating = %review.rating)
    )]
    async fn add_review(&self, review: &NewReview) -> Result<(), GatewayError> {
        let url = self.url(&["reviews", "add"])?;
        self.send_empty(Method::POST, url, Some(review)).await
    }

    #[instrument(skip(self), fields(review_id = %id))]
    async fn delete_review(&self, id: &ReviewId) -> Result<(), GatewayError> {
        let url = self.url(&["reviews", "delete", id.as_str()])?;
        self.call(Method::DELETE, url).await
    }
}
