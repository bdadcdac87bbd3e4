//! Orders: the user's own history, the admin's full list, and payments.

use std::sync::Arc;

use tiffin_core::{Order, OrderId, OrderStatus, PaymentDetails, User, UserId};
use tracing::{error, info, instrument};

use super::{IdentityProvider, NOT_AUTHENTICATED, StateCell, request_flags};
use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::sequence::{RequestSequencer, Ticket};

const FETCH_FAILED: &str = "Failed to fetch orders";
const FETCH_ALL_FAILED: &str = "Failed to fetch all orders";
const FETCH_ONE_FAILED: &str = "Failed to fetch order details";
const PLACE_FAILED: &str = "Failed to place order";
const CANCEL_FAILED: &str = "Failed to cancel order";
const STATUS_FAILED: &str = "Failed to update order status";
const PAYMENT_FAILED: &str = "Payment failed";

/// Snapshot of the orders store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrdersState {
    /// Own orders, or every order after an admin fetch.
    pub orders: Vec<Order>,
    /// Order last loaded by ID.
    pub current_order: Option<Order>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(OrdersState);

pub struct OrdersStore {
    backend: Arc<dyn Backend>,
    identity: Arc<dyn IdentityProvider>,
    state: StateCell<OrdersState>,
    list_requests: RequestSequencer,
    detail_requests: RequestSequencer,
    payment_requests: RequestSequencer,
}

/// Which list a refetch reloads.
#[derive(Debug, Clone, Copy)]
enum Scope<'a> {
    Own(&'a UserId),
    All,
}

impl<'a> Scope<'a> {
    fn for_user(user: &'a User) -> Self {
        if user.is_admin() {
            Self::All
        } else {
            Self::Own(&user.id)
        }
    }
}

impl OrdersStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            backend,
            identity,
            state: StateCell::new("orders"),
            list_requests: RequestSequencer::new("list"),
            detail_requests: RequestSequencer::new("detail"),
            payment_requests: RequestSequencer::new("payment"),
        }
    }

    pub async fn snapshot(&self) -> OrdersState {
        self.state.snapshot().await
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    async fn require_user(&self) -> Option<User> {
        let user = self.identity.current_user().await;
        if user.is_none() {
            self.state.reject(NOT_AUTHENTICATED).await;
        }
        user
    }

    async fn load(&self, scope: Scope<'_>) -> Result<Vec<Order>, GatewayError> {
        match scope {
            Scope::Own(user_id) => self.backend.user_orders(user_id).await,
            Scope::All => self.backend.all_orders().await,
        }
    }

    /// Reload a list under `ticket`, recording `failure` if it fails.
    async fn refetch(&self, scope: Scope<'_>, ticket: Ticket, failure: &str) {
        match self.load(scope).await {
            Ok(orders) => {
                self.state
                    .settle(&self.list_requests, ticket, |state| state.orders = orders)
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch orders");
                self.state.fail(&self.list_requests, ticket, failure).await;
            }
        }
    }

    /// Replace the list with the signed-in user's orders.
    #[instrument(skip(self))]
    pub async fn fetch_orders(&self) {
        let Some(user) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.list_requests).await;
        self.refetch(Scope::Own(&user.id), ticket, FETCH_FAILED).await;
    }

    /// Replace the list with every order (admin).
    #[instrument(skip(self))]
    pub async fn fetch_all_orders(&self) {
        let ticket = self.state.begin(&self.list_requests).await;
        self.refetch(Scope::All, ticket, FETCH_ALL_FAILED).await;
    }

    /// Load one order into `current_order`.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn fetch_order_by_id(&self, id: &OrderId) {
        let ticket = self.state.begin(&self.detail_requests).await;
        match self.backend.get_order(id).await {
            Ok(order) => {
                self.state
                    .settle(&self.detail_requests, ticket, |state| {
                        state.current_order = Some(order);
                    })
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch order details");
                self.state
                    .fail(&self.detail_requests, ticket, FETCH_ONE_FAILED)
                    .await;
            }
        }
    }

    /// Place an order from the user's backend cart, then reload own orders.
    ///
    /// Returns the new order's ID.
    #[instrument(skip(self))]
    pub async fn place_order(&self) -> Option<OrderId> {
        let user = self.require_user().await?;
        let ticket = self.state.begin(&self.list_requests).await;
        match self.backend.place_order(&user.id).await {
            Ok(order) => {
                info!(order_id = %order.id, "Order placed");
                self.refetch(Scope::Own(&user.id), ticket, PLACE_FAILED).await;
                Some(order.id)
            }
            Err(e) => {
                error!(error = %e, "Failed to place order");
                self.state.fail(&self.list_requests, ticket, PLACE_FAILED).await;
                None
            }
        }
    }

    /// Cancel an order, then reload own orders.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) {
        let Some(user) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.list_requests).await;
        if let Err(e) = self.backend.cancel_order(id).await {
            error!(error = %e, "Failed to cancel order");
            self.state.fail(&self.list_requests, ticket, CANCEL_FAILED).await;
            return;
        }
        info!("Order cancelled");
        self.refetch(Scope::Own(&user.id), ticket, CANCEL_FAILED).await;
    }

    /// Move an order to `status`, then reload every order for an admin or
    /// own orders otherwise.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: &OrderId, status: OrderStatus) {
        let Some(user) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.list_requests).await;
        if let Err(e) = self.backend.update_order_status(id, status).await {
            error!(error = %e, "Failed to update order status");
            self.state.fail(&self.list_requests, ticket, STATUS_FAILED).await;
            return;
        }
        info!("Order status updated");
        self.refetch(Scope::for_user(&user), ticket, STATUS_FAILED)
            .await;
    }

    /// Charge an order. Local orders are left untouched.
    #[instrument(skip(self, details), fields(order_id = %order_id, method = %details.method))]
    pub async fn process_payment(&self, order_id: &OrderId, details: &PaymentDetails) -> bool {
        let ticket = self.state.begin(&self.payment_requests).await;
        match self.backend.charge(order_id, details).await {
            Ok(()) => {
                info!("Payment accepted");
                self.state.settle(&self.payment_requests, ticket, |_| {}).await;
                true
            }
            Err(e) => {
                error!(error = %e, "Payment failed");
                self.state
                    .fail(&self.payment_requests, ticket, PAYMENT_FAILED)
                    .await;
                false
            }
        }
    }
}
