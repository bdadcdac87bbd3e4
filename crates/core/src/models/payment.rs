//! Payments against orders.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, PaymentId, PaymentMethod, PaymentStatus, Price};

/// A recorded payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Price,
    #[serde(default)]
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    #[serde(
        default,
        with = "crate::types::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Card data for a credit card charge.
///
/// Implements `Debug` manually so card data never reaches logs.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl fmt::Debug for CardDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last4: String = self
            .number
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        f.debug_struct("CardDetails")
            .field("number", &format!("****{last4}"))
            .field("expiry", &"[REDACTED]")
            .field("cvv", &"[REDACTED]")
            .finish()
    }
}

/// How the customer wants to pay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_details: Option<CardDetails>,
}

impl PaymentDetails {
    /// Pay on delivery.
    #[must_use]
    pub const fn cash() -> Self {
        Self {
            method: PaymentMethod::Cash,
            card_details: None,
        }
    }

    /// Pay by credit card.
    #[must_use]
    pub const fn card(details: CardDetails) -> Self {
        Self {
            method: PaymentMethod::CreditCard,
            card_details: Some(details),
        }
    }

    /// Card payments need card details; other methods must not carry them.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.method.requires_card() == self.card_details.is_some()
    }
}
