//! Delivery addresses and user notifications.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AddressId, NotificationId, UserId};

/// A delivery address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// An address to save for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAddress {
    pub user_id: UserId,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

/// Address fields entered by a user; the owner is filled in on save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressDetails {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
}

impl NewAddress {
    #[must_use]
    pub fn for_user(user_id: UserId, details: AddressDetails) -> Self {
        let AddressDetails {
            street,
            city,
            state,
            zip_code,
            country,
            is_default,
        } = details;
        Self {
            user_id,
            street,
            city,
            state,
            zip_code,
            country,
            is_default,
        }
    }
}

/// A message delivered to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(
        default,
        with = "crate::types::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}
