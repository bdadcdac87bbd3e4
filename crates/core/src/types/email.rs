//! Account email addresses.
//!
//! The backend uses the email as the login username. Input typed by a user is
//! trimmed and checked for a `local@domain` shape; addresses coming back from
//! the backend are taken as they are, since older accounts may carry plain
//! usernames.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Why a typed address was rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email must be at most {max} characters")]
    TooLong { max: usize },
    #[error("email must look like name@domain")]
    NotAnAddress,
    #[error("email cannot contain whitespace")]
    Whitespace,
}

/// An account email.
///
/// ```
/// use tiffin_core::Email;
///
/// let email = Email::parse("  Asha@Tiffin.test ").unwrap();
/// assert_eq!(email.as_str(), "Asha@tiffin.test");
/// assert!(Email::parse("asha").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Longest address a mail server has to accept.
    pub const MAX_LENGTH: usize = 254;

    /// Validate a typed address.
    ///
    /// Surrounding whitespace is dropped and the domain is lowercased; the
    /// local part keeps its case.
    ///
    /// # Errors
    ///
    /// Returns `EmailError` if the trimmed input is empty, too long, contains
    /// whitespace, or is not exactly one non-empty local part and one
    /// non-empty domain joined by `@`.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        match s.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(format!("{local}@{}", domain.to_lowercase())))
            }
            _ => Err(EmailError::NotAnAddress),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Everything before the `@`, or the whole value for a plain username.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.split_once('@').map_or(self.0.as_str(), |(local, _)| local)
    }

    /// A display name for accounts registered without one.
    #[must_use]
    pub fn fallback_name(&self) -> &str {
        self.local_part()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
