//! `/auth/*` calls.

use async_trait::async_trait;
use reqwest::Method;
use tiffin_core::{AuthSession, Credentials, Registration};
use tracing::instrument;

use super::Gateway;
use crate::error::GatewayError;

/// Session endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange credentials for a user and bearer token.
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, GatewayError>;

    /// Create an account; the backend logs the new user straight in.
    async fn register(&self, registration: &Registration) -> Result<AuthSession, GatewayError>;

    /// Tell the backend the session is over.
    async fn logout(&self) -> Result<(), GatewayError>;
}

#[async_trait]
impl AuthApi for Gateway {
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, GatewayError> {
        let url = self.url(&["auth", "login"])?;
        self.send_json(Method::POST, url, Some(credentials)).await
    }

    #[instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: &Registration) -> Result<AuthSession, GatewayError> {
        let url = self.url(&["auth", "register"])?;
        self.send_json(Method::POST, url, Some(registration)).await
    }

    #[instrument(skip(self))]
    async fn logout(&self) -> Result<(), GatewayError> {
        let url = self.url(&["auth", "logout"])?;
        self.call(Method::POST, url).await
    }
}
