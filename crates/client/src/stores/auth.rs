//! Session state: the signed-in user and the admin user list.

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use tiffin_core::{AuthSession, Credentials, Registration, User, UserId};
use tracing::{error, info, instrument, warn};

use super::{IdentityProvider, StateCell, request_flags};
use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::sequence::{RequestSequencer, Ticket};
use crate::token::TokenStore;

const LOGIN_FAILED: &str = "Invalid credentials";
const REGISTRATION_FAILED: &str = "Registration failed";
const FETCH_USERS_FAILED: &str = "Failed to fetch users";
const DELETE_USER_FAILED: &str = "Failed to delete user";

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStatus {
    Anonymous,
    Authenticating,
    Authenticated,
}

/// Snapshot of the auth store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    /// The signed-in user.
    pub user: Option<User>,
    /// Non-admin users, as last fetched by an admin.
    pub users: Vec<User>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(AuthState);

impl AuthState {
    /// Lifecycle position derived from the user and loading flag.
    #[must_use]
    pub const fn status(&self) -> AuthStatus {
        match (&self.user, self.is_loading) {
            (Some(_), _) => AuthStatus::Authenticated,
            (None, true) => AuthStatus::Authenticating,
            (None, false) => AuthStatus::Anonymous,
        }
    }
}

/// Signs users in and out and persists the bearer token.
pub struct AuthStore {
    backend: Arc<dyn Backend>,
    tokens: Arc<dyn TokenStore>,
    state: StateCell<AuthState>,
    session_requests: RequestSequencer,
    users_requests: RequestSequencer,
}

impl AuthStore {
    /// Create an anonymous store.
    ///
    /// `tokens` must be the store the gateway reads the bearer token from.
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            backend,
            tokens,
            state: StateCell::new("auth"),
            session_requests: RequestSequencer::new("session"),
            users_requests: RequestSequencer::new("users"),
        }
    }

    pub async fn snapshot(&self) -> AuthState {
        self.state.snapshot().await
    }

    pub async fn status(&self) -> AuthStatus {
        self.snapshot().await.status()
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    /// Sign in. On failure the store is left anonymous with no token and
    /// `"Invalid credentials"` recorded.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) {
        let ticket = self.state.begin(&self.session_requests).await;
        let result = self.backend.login(credentials).await;
        self.establish(ticket, result, LOGIN_FAILED).await;
    }

    /// Create an account and sign in as it. On failure records
    /// `"Registration failed"`.
    #[instrument(skip(self, registration), fields(email = %registration.email))]
    pub async fn register(&self, registration: &Registration) {
        let ticket = self.state.begin(&self.session_requests).await;
        let result = self.backend.register(registration).await;
        self.establish(ticket, result, REGISTRATION_FAILED).await;
    }

    async fn establish(
        &self,
        ticket: Ticket,
        result: Result<AuthSession, GatewayError>,
        failure: &'static str,
    ) {
        let session = match result {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Authentication rejected");
                if !self.session_requests.is_current(ticket) {
                    return;
                }
                // The store goes anonymous, so the previous token must go too.
                if let Err(e) = self.tokens.clear().await {
                    error!(error = %e, "Failed to remove session token");
                }
                self.state
                    .fail_with(&self.session_requests, ticket, failure, |state| {
                        state.user = None;
                    })
                    .await;
                return;
            }
        };

        // A logout issued meanwhile wins; the token must not come back.
        if !self.session_requests.is_current(ticket) {
            return;
        }

        let AuthSession { user, token } = session;
        if let Err(e) = self.tokens.save(&SecretString::from(token)).await {
            error!(error = %e, "Failed to persist session token");
            self.state
                .fail(&self.session_requests, ticket, failure)
                .await;
            return;
        }

        info!(user_id = %user.id, "Signed in");
        let applied = self
            .state
            .settle(&self.session_requests, ticket, |state| state.user = Some(user))
            .await;
        if !applied {
            // Superseded by a logout while saving.
            if let Err(e) = self.tokens.clear().await {
                error!(error = %e, "Failed to remove superseded session token");
            }
        }
    }

    /// Sign out. Always succeeds locally: the token and user are cleared even
    /// when the backend call or token removal fails.
    ///
    /// The backend is told first so the request still carries the token.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        let ticket = self.session_requests.issue();

        if let Err(e) = self.backend.logout().await {
            warn!(error = %e, "Backend logout failed");
        }
        if let Err(e) = self.tokens.clear().await {
            error!(error = %e, "Failed to remove session token");
        }
        self.state
            .settle(&self.session_requests, ticket, |state| {
                state.user = None;
                state.users.clear();
                state.error = None;
            })
            .await;
        info!("Signed out");
    }

    /// Fetch all users for the admin view, dropping admin accounts.
    #[instrument(skip(self))]
    pub async fn fetch_users(&self) {
        let ticket = self.state.begin(&self.users_requests).await;
        match self.backend.all_users().await {
            Ok(users) => {
                let users: Vec<User> = users.into_iter().filter(|u| !u.is_admin()).collect();
                self.state
                    .settle(&self.users_requests, ticket, |state| state.users = users)
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch users");
                self.state
                    .fail(&self.users_requests, ticket, FETCH_USERS_FAILED)
                    .await;
            }
        }
    }

    /// Delete a user account (admin) and drop it from the local list.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: &UserId) {
        let ticket = self.state.begin(&self.users_requests).await;
        match self.backend.delete_user(id).await {
            Ok(()) => {
                self.state.patch(|state| state.users.retain(|u| u.id != *id)).await;
                self.state.settle(&self.users_requests, ticket, |_| {}).await;
            }
            Err(e) => {
                error!(error = %e, "Failed to delete user");
                self.state
                    .fail(&self.users_requests, ticket, DELETE_USER_FAILED)
                    .await;
            }
        }
    }
}

#[async_trait]
impl IdentityProvider for AuthStore {
    async fn current_user(&self) -> Option<User> {
        self.state.snapshot().await.user
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::ExposeSecret;
    use tiffin_core::{Email, Role};

    use super::*;
    use crate::stores::testing::FakeBackend;
    use crate::token::MemoryTokenStore;

    struct Harness {
        backend: Arc<FakeBackend>,
        tokens: Arc<MemoryTokenStore>,
        store: AuthStore,
    }

    fn harness() -> Harness {
        let backend = Arc::new(FakeBackend::new());
        let tokens = Arc::new(MemoryTokenStore::new());
        let store = AuthStore::new(backend.clone(), tokens.clone());
        Harness {
            backend,
            tokens,
            store,
        }
    }

    fn credentials(email: &str, password: &str) -> Credentials {
        Credentials::new(Email::parse(email).unwrap(), password)
    }

    #[tokio::test]
    async fn test_login_stores_user_and_token() {
        let h = harness();
        let user = h.backend.with_user("Asha", "a@b.com", "secret", Role::User);

        h.store.login(&credentials("a@b.com", "secret")).await;

        let state = h.store.snapshot().await;
        assert_eq!(state.user, Some(user.clone()));
        assert!(state.error.is_none());
        assert!(!state.is_loading);
        assert_eq!(state.status(), AuthStatus::Authenticated);

        let token = h.tokens.load().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), format!("token-{}", user.id));
    }

    #[tokio::test]
    async fn test_rejected_login_persists_nothing() {
        let h = harness();
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);

        h.store.login(&credentials("a@b.com", "wrong")).await;

        let state = h.store.snapshot().await;
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert_eq!(state.status(), AuthStatus::Anonymous);
        assert!(h.tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rejected_login_drops_previous_session() {
        let h = harness();
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        h.backend.with_user("Ravi", "r@b.com", "secret", Role::User);
        h.store.login(&credentials("a@b.com", "secret")).await;
        assert!(h.tokens.load().await.unwrap().is_some());

        h.store.login(&credentials("r@b.com", "wrong")).await;

        let state = h.store.snapshot().await;
        assert_eq!(state.status(), AuthStatus::Anonymous);
        assert_eq!(state.error.as_deref(), Some("Invalid credentials"));
        assert!(h.tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_stays_authenticating_while_users_load() {
        let h = Arc::new(harness());
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        let release = h.backend.hold("login");

        let pending = {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.store.login(&credentials("a@b.com", "secret")).await })
        };
        while h.backend.calls("login") == 0 {
            tokio::task::yield_now().await;
        }
        assert_eq!(h.store.status().await, AuthStatus::Authenticating);

        h.store.fetch_users().await;
        assert_eq!(h.store.status().await, AuthStatus::Authenticating);

        release.send(()).unwrap();
        pending.await.unwrap();
        let state = h.store.snapshot().await;
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_users_error_survives_login() {
        let h = harness();
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        h.backend.fail("all_users");
        h.store.fetch_users().await;

        h.store.login(&credentials("a@b.com", "secret")).await;

        let state = h.store.snapshot().await;
        assert_eq!(state.status(), AuthStatus::Authenticated);
        assert_eq!(state.error.as_deref(), Some("Failed to fetch users"));
    }

    #[tokio::test]
    async fn test_register_signs_in() {
        let h = harness();
        let registration = Registration {
            name: "Ravi".to_owned(),
            email: Email::parse("ravi@example.com").unwrap(),
            password: "pw".to_owned(),
            confirm_password: "pw".to_owned(),
        };

        h.store.register(&registration).await;

        let state = h.store.snapshot().await;
        assert_eq!(state.user.unwrap().name, "Ravi");
        assert!(h.tokens.load().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_registration_fails() {
        let h = harness();
        h.backend.with_user("Ravi", "ravi@example.com", "pw", Role::User);
        let registration = Registration {
            name: "Ravi".to_owned(),
            email: Email::parse("ravi@example.com").unwrap(),
            password: "pw".to_owned(),
            confirm_password: "pw".to_owned(),
        };

        h.store.register(&registration).await;

        let state = h.store.snapshot().await;
        assert!(state.user.is_none());
        assert_eq!(state.error.as_deref(), Some("Registration failed"));
    }

    #[tokio::test]
    async fn test_logout_succeeds_when_backend_fails() {
        let h = harness();
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        h.store.login(&credentials("a@b.com", "secret")).await;
        h.backend.fail("logout");

        h.store.logout().await;

        let state = h.store.snapshot().await;
        assert!(state.user.is_none());
        assert!(state.error.is_none());
        assert!(h.tokens.load().await.unwrap().is_none());
        assert_eq!(h.backend.calls("logout"), 1);
    }

    #[tokio::test]
    async fn test_logout_discards_inflight_login() {
        let h = Arc::new(harness());
        h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        let release = h.backend.hold("login");

        let pending = {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.store.login(&credentials("a@b.com", "secret")).await })
        };
        while h.backend.calls("login") == 0 {
            tokio::task::yield_now().await;
        }

        h.store.logout().await;
        release.send(()).unwrap();
        pending.await.unwrap();

        assert!(h.store.snapshot().await.user.is_none());
        assert!(h.tokens.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_users_hides_admins() {
        let h = harness();
        h.backend.with_user("Admin", "admin@b.com", "pw", Role::Admin);
        let customer = h.backend.with_user("Asha", "a@b.com", "pw", Role::User);

        h.store.fetch_users().await;

        assert_eq!(h.store.snapshot().await.users, vec![customer]);
    }

    #[tokio::test]
    async fn test_fetch_users_failure() {
        let h = harness();
        h.backend.fail("all_users");

        h.store.fetch_users().await;

        let state = h.store.snapshot().await;
        assert_eq!(state.error.as_deref(), Some("Failed to fetch users"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_delete_user_patches_locally() {
        let h = harness();
        let a = h.backend.with_user("Asha", "a@b.com", "pw", Role::User);
        let b = h.backend.with_user("Ravi", "r@b.com", "pw", Role::User);
        h.store.fetch_users().await;

        h.store.delete_user(&a.id).await;

        assert_eq!(h.store.snapshot().await.users, vec![b]);
        assert_eq!(h.backend.calls("all_users"), 1);
    }

    #[tokio::test]
    async fn test_identity_follows_session() {
        let h = harness();
        let user = h.backend.with_user("Asha", "a@b.com", "secret", Role::User);
        assert!(h.store.current_user_id().await.is_none());

        h.store.login(&credentials("a@b.com", "secret")).await;
        assert_eq!(h.store.current_user_id().await, Some(user.id));

        h.store.logout().await;
        assert!(h.store.current_user().await.is_none());
    }

    #[tokio::test]
    async fn test_clear_error() {
        let h = harness();
        h.store.login(&credentials("x@b.com", "nope")).await;
        assert!(h.store.snapshot().await.error.is_some());

        h.store.clear_error().await;
        assert!(h.store.snapshot().await.error.is_none());
    }
}
