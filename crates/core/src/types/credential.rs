//! Login and registration payloads.
//!
//! The backend authenticates by username, and the username is the account's
//! email address, so both payloads serialize the email under `username`.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::email::Email;

/// Login credentials.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email, sent as `username`.
    #[serde(rename = "username")]
    pub email: Email,
    /// Plain-text password, only ever sent over the wire.
    pub password: String,
}

impl Credentials {
    /// Create login credentials.
    #[must_use]
    pub fn new(email: Email, password: impl Into<String>) -> Self {
        Self {
            email,
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Errors caught before a registration is sent.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// Display name is blank.
    #[error("name cannot be empty")]
    EmptyName,
    /// Password is blank.
    #[error("password cannot be empty")]
    EmptyPassword,
    /// Password and confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

/// New account registration.
///
/// `confirm_password` is a form-level field: it is validated by
/// [`Registration::validate`] and never serialized.
#[derive(Clone, Serialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Account email, sent as `username`.
    #[serde(rename = "username")]
    pub email: Email,
    /// Chosen password.
    pub password: String,
    /// Repeated password from the form.
    #[serde(skip)]
    pub confirm_password: String,
}

impl Registration {
    /// Check the form before any network call.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: blank name, blank password, or a
    /// confirmation that does not match.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        if self.name.trim().is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if self.password.is_empty() {
            return Err(RegistrationError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
