//! Reviews for one food item at a time.

use std::sync::Arc;

use tiffin_core::{FoodItemId, NewReview, Rating, Review, ReviewId, average_rating};
use tracing::{error, info, instrument};

use super::{IdentityProvider, NOT_AUTHENTICATED, StateCell, request_flags};
use crate::gateway::Backend;
use crate::sequence::{RequestSequencer, Ticket};

const FETCH_FAILED: &str = "Failed to fetch reviews";
const ADD_FAILED: &str = "Failed to add review";
const DELETE_FAILED: &str = "Failed to delete review";

/// Snapshot of the reviews store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewsState {
    /// Item the reviews belong to.
    pub food_item_id: Option<FoodItemId>,
    pub reviews: Vec<Review>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(ReviewsState);

impl ReviewsState {
    /// Mean rating of the loaded reviews.
    #[must_use]
    pub fn average(&self) -> Option<f64> {
        average_rating(&self.reviews)
    }
}

pub struct ReviewsStore {
    backend: Arc<dyn Backend>,
    identity: Arc<dyn IdentityProvider>,
    state: StateCell<ReviewsState>,
    requests: RequestSequencer,
}

impl ReviewsStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            backend,
            identity,
            state: StateCell::new("reviews"),
            requests: RequestSequencer::new("reviews"),
        }
    }

    pub async fn snapshot(&self) -> ReviewsState {
        self.state.snapshot().await
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    /// Replace the loaded reviews with those of `food_item_id`.
    #[instrument(skip(self), fields(food_item_id = %food_item_id))]
    pub async fn fetch_reviews(&self, food_item_id: &FoodItemId) {
        let ticket = self.state.begin(&self.requests).await;
        self.refetch(food_item_id, ticket, FETCH_FAILED).await;
    }

    async fn refetch(&self, food_item_id: &FoodItemId, ticket: Ticket, failure: &str) {
        match self.backend.reviews_for(food_item_id).await {
            Ok(reviews) => {
                self.state
                    .settle(&self.requests, ticket, |state| {
                        state.food_item_id = Some(food_item_id.clone());
                        state.reviews = reviews;
                    })
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch reviews");
                self.state.fail(&self.requests, ticket, failure).await;
            }
        }
    }

    /// Post a review as the signed-in user, then reload that item's reviews.
    #[instrument(skip(self, content), fields(food_item_id = %food_item_id, rating = %rating))]
    pub async fn add_review(&self, food_item_id: &FoodItemId, content: &str, rating: Rating) {
        let Some(user_id) = self.identity.current_user_id().await else {
            self.state.reject(NOT_AUTHENTICATED).await;
            return;
        };

        let review = NewReview {
            user_id,
            food_item_id: food_item_id.clone(),
            content: content.to_owned(),
            rating,
        };
        let ticket = self.state.begin(&self.requests).await;
        if let Err(e) = self.backend.add_review(&review).await {
            error!(error = %e, "Failed to add review");
            self.state.fail(&self.requests, ticket, ADD_FAILED).await;
            return;
        }
        info!("Review added");
        self.refetch(food_item_id, ticket, ADD_FAILED).await;
    }

    /// Delete a review and drop it from the loaded list.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) {
        let ticket = self.state.begin(&self.requests).await;
        match self.backend.delete_review(id).await {
            Ok(()) => {
                self.state
                    .patch(|state| state.reviews.retain(|review| review.id != *id))
                    .await;
                self.state.settle(&self.requests, ticket, |_| {}).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to delete review");
                self.state.fail(&self.requests, ticket, DELETE_FAILED).await;
            }
        }
    }
}
