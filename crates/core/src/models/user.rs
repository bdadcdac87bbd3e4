//! User accounts and authenticated sessions.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// A customer or administrator account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Account email. The backend calls this the username.
    #[serde(default, alias = "username")]
    pub email: Option<Email>,
    #[serde(default)]
    pub role: Role,
}

impl User {
    /// Whether this account is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Name to show for this user, falling back to the email's local part.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return &self.name;
        }
        self.email.as_ref().map_or("", Email::fallback_name)
    }
}

/// Profile fields a user may change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Email>,
}

/// Response body of a successful login or registration.
///
/// Implements `Debug` manually to redact the bearer token.
#[derive(Clone, Deserialize)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSession")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
