//! The signed-in user's cart.
//!
//! The backend owns the cart. Every mutation is followed by a full refetch so
//! the local copy always equals what the backend last reported.

use std::sync::Arc;

use tiffin_core::{CartItem, FoodItemId, OrderId, Price, UserId};
use tracing::{error, info, instrument};

use super::{IdentityProvider, NOT_AUTHENTICATED, StateCell, request_flags};
use crate::gateway::Backend;
use crate::sequence::{RequestSequencer, Ticket};

const FETCH_FAILED: &str = "Failed to fetch cart items";
const ADD_FAILED: &str = "Failed to add item to cart";
const REMOVE_FAILED: &str = "Failed to remove item from cart";
const CLEAR_FAILED: &str = "Failed to clear cart";
const CHECKOUT_FAILED: &str = "Checkout failed";

/// Snapshot of the cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    pub items: Vec<CartItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(CartState);

impl CartState {
    /// Sum of line totals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }
}

/// Cart actions, scoped to the user reported by the identity provider.
pub struct CartStore {
    backend: Arc<dyn Backend>,
    identity: Arc<dyn IdentityProvider>,
    state: StateCell<CartState>,
    requests: RequestSequencer,
}

impl CartStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            backend,
            identity,
            state: StateCell::new("cart"),
            requests: RequestSequencer::new("cart"),
        }
    }

    pub async fn snapshot(&self) -> CartState {
        self.state.snapshot().await
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    /// Current user ID, or record the authentication error.
    async fn require_user(&self) -> Option<UserId> {
        let user_id = self.identity.current_user_id().await;
        if user_id.is_none() {
            self.state.reject(NOT_AUTHENTICATED).await;
        }
        user_id
    }

    /// Replace the local cart with the backend's.
    #[instrument(skip(self))]
    pub async fn fetch_cart_items(&self) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.requests).await;
        self.refetch(&user_id, ticket, FETCH_FAILED).await;
    }

    async fn refetch(&self, user_id: &UserId, ticket: Ticket, failure: &str) {
        match self.backend.cart_items(user_id).await {
            Ok(items) => {
                self.state
                    .settle(&self.requests, ticket, |state| state.items = items)
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch cart items");
                self.state.fail(&self.requests, ticket, failure).await;
            }
        }
    }

    /// Add one unit of a food item, then refetch.
    #[instrument(skip(self), fields(food_item_id = %food_item_id))]
    pub async fn add_to_cart(&self, food_item_id: &FoodItemId) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.requests).await;
        if let Err(e) = self.backend.add_to_cart(&user_id, food_item_id).await {
            error!(error = %e, "Failed to add item to cart");
            self.state.fail(&self.requests, ticket, ADD_FAILED).await;
            return;
        }
        self.refetch(&user_id, ticket, ADD_FAILED).await;
    }

    /// Remove a food item's line, then refetch.
    #[instrument(skip(self), fields(food_item_id = %food_item_id))]
    pub async fn remove_from_cart(&self, food_item_id: &FoodItemId) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.requests).await;
        if let Err(e) = self.backend.remove_from_cart(&user_id, food_item_id).await {
            error!(error = %e, "Failed to remove item from cart");
            self.state.fail(&self.requests, ticket, REMOVE_FAILED).await;
            return;
        }
        self.refetch(&user_id, ticket, REMOVE_FAILED).await;
    }

    /// Empty the cart on the backend, then locally.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.requests).await;
        match self.backend.clear_cart(&user_id).await {
            Ok(()) => {
                self.state
                    .settle(&self.requests, ticket, |state| state.items.clear())
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to clear cart");
                self.state.fail(&self.requests, ticket, CLEAR_FAILED).await;
            }
        }
    }

    /// Place an order from the cart and empty the local copy.
    ///
    /// Returns the new order's ID. An empty cart returns `None` without
    /// calling the backend and without recording an error.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Option<OrderId> {
        let user_id = self.require_user().await?;
        if self.state.snapshot().await.items.is_empty() {
            info!("Checkout skipped, cart is empty");
            return None;
        }

        let ticket = self.state.begin(&self.requests).await;
        match self.backend.place_order(&user_id).await {
            Ok(order) => {
                info!(order_id = %order.id, total = %order.total, "Order placed from cart");
                // The order exists whether or not a newer cart request is
                // pending, so the local cart is emptied unconditionally.
                self.state.patch(|state| state.items.clear()).await;
                self.state.settle(&self.requests, ticket, |_| {}).await;
                Some(order.id)
            }
            Err(e) => {
                error!(error = %e, "Checkout failed");
                self.state.fail(&self.requests, ticket, CHECKOUT_FAILED).await;
                None
            }
        }
    }
}
