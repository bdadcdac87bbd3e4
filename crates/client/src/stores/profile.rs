//! The signed-in user's own account details and delivery addresses.

use std::sync::Arc;

use tiffin_core::{Address, AddressDetails, NewAddress, User, UserId, UserPatch};
use tracing::{error, info, instrument};

use super::{IdentityProvider, NOT_AUTHENTICATED, StateCell, request_flags};
use crate::gateway::Backend;
use crate::sequence::{RequestSequencer, Ticket};

const FETCH_PROFILE_FAILED: &str = "Failed to load profile";
const UPDATE_PROFILE_FAILED: &str = "Failed to update profile";
const FETCH_ADDRESSES_FAILED: &str = "Failed to load addresses";
const ADD_ADDRESS_FAILED: &str = "Failed to add address";

/// Snapshot of the profile store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileState {
    /// Account as last loaded or saved.
    pub profile: Option<User>,
    pub addresses: Vec<Address>,
    pub is_loading: bool,
    pub error: Option<String>,
}

request_flags!(ProfileState);

impl ProfileState {
    /// The address marked as default, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }
}

pub struct ProfileStore {
    backend: Arc<dyn Backend>,
    identity: Arc<dyn IdentityProvider>,
    state: StateCell<ProfileState>,
    profile_requests: RequestSequencer,
    address_requests: RequestSequencer,
}

impl ProfileStore {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            backend,
            identity,
            state: StateCell::new("profile"),
            profile_requests: RequestSequencer::new("profile"),
            address_requests: RequestSequencer::new("addresses"),
        }
    }

    pub async fn snapshot(&self) -> ProfileState {
        self.state.snapshot().await
    }

    pub async fn clear_error(&self) {
        self.state.clear_error().await;
    }

    async fn require_user(&self) -> Option<UserId> {
        let user_id = self.identity.current_user_id().await;
        if user_id.is_none() {
            self.state.reject(NOT_AUTHENTICATED).await;
        }
        user_id
    }

    /// Load the signed-in user's account from the backend.
    #[instrument(skip(self))]
    pub async fn fetch_profile(&self) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.profile_requests).await;
        match self.backend.get_user(&user_id).await {
            Ok(user) => {
                self.state
                    .settle(&self.profile_requests, ticket, |state| state.profile = Some(user))
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to load profile");
                self.state
                    .fail(&self.profile_requests, ticket, FETCH_PROFILE_FAILED)
                    .await;
            }
        }
    }

    /// Change the signed-in user's name or email. The saved account replaces
    /// the loaded one.
    #[instrument(skip(self, patch))]
    pub async fn update_profile(&self, patch: &UserPatch) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.profile_requests).await;
        match self.backend.update_user(&user_id, patch).await {
            Ok(user) => {
                info!(user_id = %user.id, "Profile updated");
                self.state
                    .settle(&self.profile_requests, ticket, |state| state.profile = Some(user))
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to update profile");
                self.state
                    .fail(&self.profile_requests, ticket, UPDATE_PROFILE_FAILED)
                    .await;
            }
        }
    }

    /// Replace the loaded addresses with the signed-in user's.
    #[instrument(skip(self))]
    pub async fn fetch_addresses(&self) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.address_requests).await;
        self.refetch_addresses(&user_id, ticket, FETCH_ADDRESSES_FAILED)
            .await;
    }

    async fn refetch_addresses(&self, user_id: &UserId, ticket: Ticket, failure: &str) {
        match self.backend.addresses(user_id).await {
            Ok(addresses) => {
                self.state
                    .settle(&self.address_requests, ticket, |state| {
                        state.addresses = addresses;
                    })
                    .await;
            }
            Err(e) => {
                error!(error = %e, "Failed to load addresses");
                self.state.fail(&self.address_requests, ticket, failure).await;
            }
        }
    }

    /// Save an address for the signed-in user, then reload their addresses.
    #[instrument(skip(self, details), fields(city = %details.city))]
    pub async fn add_address(&self, details: AddressDetails) {
        let Some(user_id) = self.require_user().await else {
            return;
        };
        let ticket = self.state.begin(&self.address_requests).await;
        let address = NewAddress::for_user(user_id.clone(), details);
        if let Err(e) = self.backend.add_address(&address).await {
            error!(error = %e, "Failed to add address");
            self.state
                .fail(&self.address_requests, ticket, ADD_ADDRESS_FAILED)
                .await;
            return;
        }
        info!("Address added");
        self.refetch_addresses(&user_id, ticket, ADD_ADDRESS_FAILED)
            .await;
    }
}
