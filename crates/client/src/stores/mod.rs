//! Client-side state stores.
//!
//! Each store owns one slice of state and exposes actions that call the
//! backend and reconcile local state from the response. Actions never return
//! errors: failures are logged and recorded as a fixed message in the store's
//! `error` field, and actions that produce a value return `None` or `false`.
//!
//! State sits behind a [`tokio::sync::RwLock`] that is only ever held for a
//! synchronous update, never across a backend call. Every request takes a
//! [`Ticket`] from the sequencer of the slice it writes; a response whose
//! ticket has been superseded is dropped without touching state or flags.
//! The loading flag covers every slice of a store, so it only drops once no
//! slice has a request outstanding.

pub mod auth;
pub mod cart;
pub mod food;
pub mod orders;
pub mod profile;
pub mod reviews;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;
use tiffin_core::{User, UserId};
use tokio::sync::RwLock;
use tracing::debug;

use crate::sequence::{RequestSequencer, Ticket};

pub use auth::{AuthState, AuthStatus, AuthStore};
pub use cart::{CartState, CartStore};
pub use food::{FoodState, FoodStore};
pub use orders::{OrdersState, OrdersStore};
pub use profile::{ProfileState, ProfileStore};
pub use reviews::{ReviewsState, ReviewsStore};

/// Error recorded when a user-scoped action runs without a signed-in user.
pub const NOT_AUTHENTICATED: &str = "User not authenticated";

/// Read-only access to the signed-in user.
///
/// Stores that scope requests to a user read identity through this trait
/// rather than holding the auth store itself.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// The signed-in user, if any.
    async fn current_user(&self) -> Option<User>;

    /// ID of the signed-in user, if any.
    async fn current_user_id(&self) -> Option<UserId> {
        self.current_user().await.map(|user| user.id)
    }
}

/// Loading flag and error message carried by every store state.
pub(crate) trait RequestFlags {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

/// Store state guarded for short, non-awaiting updates.
///
/// A store may order several slices with separate sequencers. `is_loading`
/// stays set while any slice has a current request outstanding, and an error
/// is only cleared by a new request on the slice that recorded it.
pub(crate) struct StateCell<S> {
    name: &'static str,
    slot: RwLock<Slot<S>>,
}

struct Slot<S> {
    state: S,
    in_flight: Vec<&'static str>,
    /// Slice whose request recorded the current error; `None` for rejections.
    error_slice: Option<&'static str>,
}

impl<S: RequestFlags> Slot<S> {
    fn finish(&mut self, slice: &'static str) {
        self.in_flight.retain(|s| *s != slice);
        let loading = !self.in_flight.is_empty();
        self.state.set_loading(loading);
    }
}

impl<S: Clone + Default + RequestFlags> StateCell<S> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            slot: RwLock::new(Slot {
                state: S::default(),
                in_flight: Vec::new(),
                error_slice: None,
            }),
        }
    }

    pub(crate) async fn snapshot(&self) -> S {
        self.slot.read().await.state.clone()
    }

    /// Start a request on the slice guarded by `sequencer`.
    ///
    /// Sets `is_loading` and clears an error left by this slice or by a
    /// rejected action.
    pub(crate) async fn begin(&self, sequencer: &RequestSequencer) -> Ticket {
        let ticket = sequencer.issue();
        let slice = sequencer.slice();
        let mut slot = self.slot.write().await;
        if !slot.in_flight.contains(&slice) {
            slot.in_flight.push(slice);
        }
        slot.state.set_loading(true);
        if slot.error_slice.is_none_or(|owner| owner == slice) {
            slot.state.set_error(None);
            slot.error_slice = None;
        }
        ticket
    }

    /// Apply a successful response if `ticket` is still current.
    ///
    /// Returns whether the response was applied.
    pub(crate) async fn settle(
        &self,
        sequencer: &RequestSequencer,
        ticket: Ticket,
        apply: impl FnOnce(&mut S) + Send,
    ) -> bool {
        let mut slot = self.slot.write().await;
        if !sequencer.is_current(ticket) {
            debug!(store = self.name, ticket = ticket.value(), "Dropping stale response");
            return false;
        }
        apply(&mut slot.state);
        slot.finish(sequencer.slice());
        true
    }

    /// Record a failed request if `ticket` is still current.
    pub(crate) async fn fail(&self, sequencer: &RequestSequencer, ticket: Ticket, message: &str) {
        self.fail_with(sequencer, ticket, message, |_| {}).await;
    }

    /// Like [`Self::fail`], also resetting part of the state.
    pub(crate) async fn fail_with(
        &self,
        sequencer: &RequestSequencer,
        ticket: Ticket,
        message: &str,
        reset: impl FnOnce(&mut S) + Send,
    ) {
        let mut slot = self.slot.write().await;
        if !sequencer.is_current(ticket) {
            debug!(store = self.name, ticket = ticket.value(), "Dropping stale failure");
            return;
        }
        reset(&mut slot.state);
        slot.state.set_error(Some(message.to_owned()));
        slot.error_slice = Some(sequencer.slice());
        slot.finish(sequencer.slice());
    }

    /// Patch state regardless of request ordering.
    ///
    /// Used for local patches after a successful mutation; the mutation
    /// happened on the backend whether or not a newer request is in flight.
    pub(crate) async fn patch(&self, apply: impl FnOnce(&mut S) + Send) {
        apply(&mut self.slot.write().await.state);
    }

    /// Record an error without starting a request.
    pub(crate) async fn reject(&self, message: &str) {
        let mut slot = self.slot.write().await;
        slot.state.set_error(Some(message.to_owned()));
        slot.error_slice = None;
    }

    /// Reset the error message.
    pub(crate) async fn clear_error(&self) {
        let mut slot = self.slot.write().await;
        slot.state.set_error(None);
        slot.error_slice = None;
    }
}

/// Implement [`RequestFlags`] for a state with `is_loading` and `error` fields.
macro_rules! request_flags {
    ($state:ty) => {
        impl $crate::stores::RequestFlags for $state {
            fn set_loading(&mut self, loading: bool) {
                self.is_loading = loading;
            }

            fn set_error(&mut self, error: Option<String>) {
                self.error = error;
            }
        }
    };
}

pub(crate) use request_flags;

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Sample {
        value: u32,
        is_loading: bool,
        error: Option<String>,
    }

    request_flags!(Sample);

    #[tokio::test]
    async fn test_begin_sets_loading_and_clears_error() {
        let cell = StateCell::<Sample>::new("sample");
        let seq = RequestSequencer::new("values");
        cell.reject("boom").await;

        cell.begin(&seq).await;

        let state = cell.snapshot().await;
        assert!(state.is_loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_stale_settle_leaves_state_alone() {
        let cell = StateCell::<Sample>::new("sample");
        let seq = RequestSequencer::new("values");

        let first = cell.begin(&seq).await;
        let second = cell.begin(&seq).await;

        assert!(!cell.settle(&seq, first, |s| s.value = 1).await);
        let state = cell.snapshot().await;
        assert_eq!(state.value, 0);
        assert!(state.is_loading);

        assert!(cell.settle(&seq, second, |s| s.value = 2).await);
        let state = cell.snapshot().await;
        assert_eq!(state.value, 2);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_stale_failure_is_dropped() {
        let cell = StateCell::<Sample>::new("sample");
        let seq = RequestSequencer::new("values");

        let first = cell.begin(&seq).await;
        let _second = cell.begin(&seq).await;
        cell.fail(&seq, first, "late").await;

        assert!(cell.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_patch_ignores_sequencing() {
        let cell = StateCell::<Sample>::new("sample");
        let seq = RequestSequencer::new("values");
        let _pending = cell.begin(&seq).await;

        cell.patch(|s| s.value = 9).await;

        let state = cell.snapshot().await;
        assert_eq!(state.value, 9);
        assert!(state.is_loading);
    }

    #[tokio::test]
    async fn test_loading_waits_for_every_slice() {
        let cell = StateCell::<Sample>::new("sample");
        let values = RequestSequencer::new("values");
        let extras = RequestSequencer::new("extras");

        let slow = cell.begin(&values).await;
        let fast = cell.begin(&extras).await;
        assert!(cell.settle(&extras, fast, |s| s.value = 1).await);
        assert!(cell.snapshot().await.is_loading);

        assert!(cell.settle(&values, slow, |s| s.value = 2).await);
        assert!(!cell.snapshot().await.is_loading);
    }

    #[tokio::test]
    async fn test_error_survives_other_slice_request() {
        let cell = StateCell::<Sample>::new("sample");
        let values = RequestSequencer::new("values");
        let extras = RequestSequencer::new("extras");

        let failed = cell.begin(&values).await;
        cell.fail(&values, failed, "values broke").await;
        let other = cell.begin(&extras).await;
        assert_eq!(cell.snapshot().await.error.as_deref(), Some("values broke"));
        cell.settle(&extras, other, |_| {}).await;

        cell.begin(&values).await;
        assert!(cell.snapshot().await.error.is_none());
    }

    #[tokio::test]
    async fn test_settle_without_begin_keeps_other_slices_loading() {
        let cell = StateCell::<Sample>::new("sample");
        let values = RequestSequencer::new("values");
        let extras = RequestSequencer::new("extras");

        let _pending = cell.begin(&values).await;
        let ticket = extras.issue();
        cell.settle(&extras, ticket, |s| s.value = 3).await;

        assert!(cell.snapshot().await.is_loading);
    }
}
