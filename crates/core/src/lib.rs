//! Tiffin Core - Shared domain types library.
//!
//! This crate provides the types used across all Tiffin components:
//! - `client` - Remote service gateway and client-side stores
//! - `cli` - Command-line front end driving the stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async. This keeps it lightweight and lets every layer share the
//! same view of the backend's resources.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, ratings, and statuses
//! - [`models`] - Client-side projections of backend resources and request payloads
//! - [`search`] - Lenient menu search and filtering

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod search;
pub mod types;

pub use models::*;
pub use search::{MenuFilter, lenient_match};
pub use types::*;
