//! Remote service gateway.
//!
//! A single HTTP client configured with the backend base URL. Every outgoing
//! request reads the persisted bearer token and, when one exists, attaches it
//! as `Authorization: Bearer <token>`. Each request also carries a fresh
//! `x-request-id` for correlation with backend logs.
//!
//! # Call groups
//!
//! One trait per backend resource group, all implemented by [`Gateway`]:
//!
//! | trait | paths |
//! |---|---|
//! | [`AuthApi`] | `/auth/*` |
//! | [`UsersApi`] | `/users/*` |
//! | [`FoodApi`] | `/food/*` |
//! | [`CartApi`] | `/cart/*` |
//! | [`OrdersApi`] | `/orders/*` |
//! | [`AdminApi`] | `/admin/*` |
//! | [`PaymentApi`] | `/payment/*` |
//! | [`ReviewsApi`] | `/reviews/*` |
//! | [`CategoriesApi`] | `/categories/*` |
//! | [`AddressApi`] | `/address/*` |
//! | [`NotificationsApi`] | `/notifications/*` |
//!
//! Methods issue exactly one request and return the parsed body. There are no
//! retries, no caching, and no batching.

pub mod address;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod categories;
pub mod food;
pub mod notifications;
pub mod orders;
pub mod payment;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::GatewayError;
use crate::token::{FileTokenStore, TokenStore};

pub use address::AddressApi;
pub use admin::AdminApi;
pub use auth::AuthApi;
pub use cart::CartApi;
pub use categories::CategoriesApi;
pub use food::FoodApi;
pub use notifications::NotificationsApi;
pub use orders::OrdersApi;
pub use payment::PaymentApi;
pub use reviews::ReviewsApi;
pub use users::UsersApi;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Placeholder for requests without a body.
const NO_BODY: Option<&'static ()> = None;

/// Everything the stores call.
///
/// Implemented by [`Gateway`]; tests substitute an in-memory backend.
pub trait Backend:
    AuthApi
    + UsersApi
    + AdminApi
    + FoodApi
    + CategoriesApi
    + CartApi
    + OrdersApi
    + PaymentApi
    + ReviewsApi
    + AddressApi
{
}

impl<T> Backend for T where
    T: AuthApi
        + UsersApi
        + AdminApi
        + FoodApi
        + CategoriesApi
        + CartApi
        + OrdersApi
        + PaymentApi
        + ReviewsApi
        + AddressApi
{
}

/// HTTP client for the food-ordering backend.
///
/// Cheaply cloneable; clones share the connection pool and token store.
#[derive(Clone)]
pub struct Gateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl Gateway {
    /// Create a gateway that reads the bearer token from `tokens`.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client fails to build.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, GatewayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                base_url: config.base_url.clone(),
                tokens,
            }),
        })
    }

    /// Create a gateway persisting the token to the configured file.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Http` if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GatewayError> {
        Self::new(config, Arc::new(FileTokenStore::new(&config.token_file)))
    }

    /// The token store consulted before every request.
    #[must_use]
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.inner.tokens)
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // =========================================================================
    // URL building
    // =========================================================================

    /// Join percent-encoded path segments onto the base URL.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, GatewayError> {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/");
        Ok(self.inner.base_url.join(&path)?)
    }

    /// Like [`Self::url`], with query parameters appended.
    pub(crate) fn url_with_query(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url, GatewayError> {
        let mut url = self.url(segments)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Build a request with the bearer token and a request ID attached.
    async fn request(&self, method: Method, url: Url) -> Result<RequestBuilder, GatewayError> {
        let mut builder = self
            .inner
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, Uuid::new_v4().to_string());

        if let Some(token) = self.inner.tokens.load().await? {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| GatewayError::InvalidToken)?;
            value.set_sensitive(true);
            builder = builder.header(AUTHORIZATION, value);
        }

        Ok(builder)
    }

    /// Send a request and turn non-2xx responses into `GatewayError::Api`.
    #[instrument(skip(self, url, body), fields(path = %url.path()))]
    async fn dispatch<B: Serialize + ?Sized + Sync>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<Response, GatewayError> {
        let mut builder = self.request(method, url).await?;
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(status = %status, "Backend responded");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Api { status, message });
        }

        Ok(response)
    }

    /// GET and parse the JSON body.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GatewayError> {
        self.send_json(Method::GET, url, NO_BODY).await
    }

    /// Send an optional JSON body and parse the JSON response.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized + Sync,
    {
        let response = self.dispatch(method, url, body).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Send an optional JSON body and ignore whatever the backend returns.
    ///
    /// Several mutation endpoints answer with plain text or an empty body.
    pub(crate) async fn send_empty<B>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(), GatewayError>
    where
        B: Serialize + ?Sized + Sync,
    {
        self.dispatch(method, url, body).await?;
        Ok(())
    }

    /// Bodiless variant of [`Self::send_empty`].
    pub(crate) async fn call(&self, method: Method, url: Url) -> Result<(), GatewayError> {
        self.send_empty(method, url, NO_BODY).await
    }

    /// Bodiless variant of [`Self::send_json`].
    pub(crate) async fn call_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
    ) -> Result<T, GatewayError> {
        self.send_json(method, url, NO_BODY).await
    }
}

impl std::fmt::Debug for Gateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gateway")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}
