//! Tiffin client library.
//!
//! A typed gateway over the food-ordering REST backend plus the client-side
//! stores that hold the session's view of it.
//!
//! # Architecture
//!
//! - [`gateway`] - One HTTP client, one trait per backend resource group.
//!   Pure I/O: every method issues exactly one request.
//! - [`stores`] - Auth, cart, catalog, orders, and reviews state containers.
//!   Actions call the gateway and reconcile local state from the response;
//!   failures are reported through each store's `error` field, never returned.
//! - [`App`] - Builds one instance of every store around a shared gateway.
//!
//! Stores share nothing mutable. The cart, orders, and reviews stores read the
//! signed-in user through [`stores::IdentityProvider`], implemented by
//! [`stores::AuthStore`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod error;
pub mod gateway;
pub mod sequence;
pub mod stores;
pub mod token;

pub use app::App;
pub use config::{ClientConfig, ConfigError};
pub use error::GatewayError;
pub use gateway::{Backend, Gateway};
pub use token::{FileTokenStore, MemoryTokenStore, TokenStore, TokenStoreError};
