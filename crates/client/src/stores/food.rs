//! Menu catalog: food items, categories, and the selected category filter.
//!
//! Admin mutations patch the local list from the backend's response instead
//! of refetching; a single admin is assumed to be the only writer.

use std::sync::Arc;

use tiffin_core::{Category, FoodItem, FoodItemId, FoodItemPatch, MenuFilter, NewFoodItem};
use tracing::{error, info, instrument};

use super::{StateCell, request_flags};
use crate::gateway::Backend;
use crate::sequence::RequestSequencer;

const FETCH_ITEMS_FAILED: &str = "Failed to fetch food items";
const FETCH_CATEGORIES_FAILED: &str = "Failed to fetch categories";
const ADD_FAILED: &str = "Failed to add food item";
const EDIT_FAILED: &str = "Failed to edit food item";
const DELETE_FAILED: &str = "Failed to delete food item";

/// Snapshot of the food store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoodState {
    pub items: Vec<FoodItem>,
    pub categories: Vec<Category>,
    /// Category name the menu is narrowed to; `None` shows everything.
    pub selected_category: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(FoodState);

impl FoodState {
    /// Items matching `query` within the selected category.
    #[must_use]
    pub fn menu(&self, query: &str) -> Vec<FoodItem> {
        MenuFilter::query(query)
            .in_category(self.selected_category.clone())
            .apply(&self.items)
    }
}

pub struct FoodStore {
    backend: Arc<dyn Backend>,
    state: StateCell<FoodState>,
    item_requests: RequestSequencer,
    category_requests: RequestSequencer,
}

impl FoodStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            state: StateCell::new("food"),
            item_requests: RequestSequencer::new("items"),
            category_requests: RequestSequencer::new("categories"),
        }
    }

    pub async fn snapshot(&self) -> FoodState {
        self.state.snapshot().await
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    /// Replace the item list. A failed fetch empties it.
    #[instrument(skip(self))]
    pub async fn fetch_food_items(&self) {
        let ticket = self.state.begin(&self.item_requests).await;
        match self.backend.list_food().await {
            Ok(items) => {
                self.state
                    .settle(&self.item_requests, ticket, |state| state.items = items)
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch food items");
                self.state
                    .fail_with(&self.item_requests, ticket, FETCH_ITEMS_FAILED, |state| {
                        state.items.clear();
                    })
                    .await;
            }
        }
    }

    /// Replace the category list. A failed fetch empties it.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) {
        let ticket = self.state.begin(&self.category_requests).await;
        match self.backend.list_categories().await {
            Ok(categories) => {
                self.state
                    .settle(&self.category_requests, ticket, |state| {
                        state.categories = categories;
                    })
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch categories");
                self.state
                    .fail_with(
                        &self.category_requests,
                        ticket,
                        FETCH_CATEGORIES_FAILED,
                        |state| state.categories.clear(),
                    )
                    .await;
            }
        }
    }

    /// Create an item and append the stored copy.
    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn add_food_item(&self, item: &NewFoodItem) {
        let ticket = self.state.begin(&self.item_requests).await;
        match self.backend.add_food(item).await {
            Ok(added) => {
                info!(food_item_id = %added.id, "Food item added");
                self.state.patch(|state| state.items.push(added)).await;
                self.state.settle(&self.item_requests, ticket, |_| {}).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to add food item");
                self.state.fail(&self.item_requests, ticket, ADD_FAILED).await;
            }
        }
    }

    /// Update an item and merge the backend's echo into the local copy.
    #[instrument(skip(self, patch), fields(food_item_id = %id))]
    pub async fn edit_food_item(&self, id: &FoodItemId, patch: &FoodItemPatch) {
        let ticket = self.state.begin(&self.item_requests).await;
        match self.backend.update_food(id, patch).await {
            Ok(echo) => {
                self.state
                    .patch(|state| {
                        if let Some(item) = state.items.iter_mut().find(|item| item.id == *id) {
                            item.apply(&echo);
                        }
                    })
                    .await;
                self.state.settle(&self.item_requests, ticket, |_| {}).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to edit food item");
                self.state.fail(&self.item_requests, ticket, EDIT_FAILED).await;
            }
        }
    }

    /// Delete an item and drop it from the local list.
    #[instrument(skip(self), fields(food_item_id = %id))]
    pub async fn delete_food_item(&self, id: &FoodItemId) {
        let ticket = self.state.begin(&self.item_requests).await;
        match self.backend.delete_food(id).await {
            Ok(()) => {
                info!("Food item deleted");
                self.state
                    .patch(|state| state.items.retain(|item| item.id != *id))
                    .await;
                self.state.settle(&self.item_requests, ticket, |_| {}).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to delete food item");
                self.state.fail(&self.item_requests, ticket, DELETE_FAILED).await;
            }
        }
    }

    /// Narrow the menu to one category, or clear the filter with `None`.
    pub async fn set_selected_category(&self, category: Option<String>) {
        self.state
            .patch(|state| state.selected_category = category)
            .await;
    }

    /// Items matching `query` within the selected category.
    pub async fn menu(&self, query: &str) -> Vec<FoodItem> {
        self.snapshot().await.menu(query)
    }
}
