//! Application wiring: one gateway, one instance of every store.

use std::sync::Arc;

use tracing::info;

use crate::config::ClientConfig;
use crate::error::GatewayError;
use crate::gateway::{Backend, Gateway};
use crate::stores::{AuthStore, CartStore, FoodStore, OrdersStore, ProfileStore, ReviewsStore};
use crate::token::{FileTokenStore, TokenStore};

/// All stores of one client session.
///
/// Every user-scoped store reads the signed-in user from `auth`.
pub struct App {
    pub auth: Arc<AuthStore>,
    pub cart: CartStore,
    pub food: FoodStore,
    pub orders: OrdersStore,
    pub profile: ProfileStore,
    pub reviews: ReviewsStore,
}

impl App {
    /// Build the stores around `backend`, persisting the token in `tokens`.
    ///
    /// `tokens` must be the store `backend` reads the bearer token from.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<dyn TokenStore>) -> Self {
        let auth = Arc::new(AuthStore::new(Arc::clone(&backend), tokens));
        Self {
            cart: CartStore::new(Arc::clone(&backend), auth.clone()),
            food: FoodStore::new(Arc::clone(&backend)),
            orders: OrdersStore::new(Arc::clone(&backend), auth.clone()),
            profile: ProfileStore::new(Arc::clone(&backend), auth.clone()),
            reviews: ReviewsStore::new(backend, auth.clone()),
            auth,
        }
    }

    /// Build an HTTP gateway from `config` and the stores around it.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.token_file));
        let gateway = Gateway::new(config, Arc::clone(&tokens))?;
        info!(base_url = %gateway.base_url(), "Client ready");
        Ok(Self::new(Arc::new(gateway), tokens))
    }

    /// Stores over an existing gateway, sharing its token store.
    #[must_use]
    pub fn with_gateway(gateway: Gateway) -> Self {
        let tokens = gateway.token_store();
        Self::new(Arc::new(gateway), tokens)
    }
}
