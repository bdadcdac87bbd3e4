//! Core types for Tiffin.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod credential;
pub mod email;
pub mod id;
pub mod price;
pub mod rating;
pub mod status;
pub mod timestamp;

pub use credential::{Credentials, Registration, RegistrationError};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
pub use rating::{Rating, RatingError};
pub use status::*;
