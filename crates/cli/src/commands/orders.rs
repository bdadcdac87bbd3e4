//! `orders list|show|place|cancel|pay`. The caller signs in first.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::{CardDetails, Order, OrderId, OrderStatus, PaymentDetails, PaymentMethod};

use super::{CliError, check};
use crate::render;

pub async fn list(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.orders.fetch_orders().await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    render::orders(out, &state.orders)?;
    Ok(())
}

pub async fn show(app: &App, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.orders.fetch_order_by_id(&OrderId::from(id)).await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    if let Some(order) = &state.current_order {
        render::order(out, order)?;
    }
    Ok(())
}

pub async fn place(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    let placed = app.orders.place_order().await;
    check(app.orders.snapshot().await.error)?;
    if let Some(id) = placed {
        writeln!(out, "Order {id} placed")?;
    }
    Ok(())
}

/// Refuse a status change the order's current status does not allow.
pub fn check_transition(order: &Order, next: OrderStatus) -> Result<(), CliError> {
    let allowed = if next == OrderStatus::Cancelled {
        order.is_cancellable()
    } else {
        order.status.can_transition_to(next)
    };
    if allowed {
        Ok(())
    } else {
        Err(CliError::InvalidArgument(format!(
            "order {} is {} and cannot become {next}",
            order.id, order.status
        )))
    }
}

/// Load an order and check it may move to `next`.
pub async fn ensure_transition(
    app: &App,
    id: &OrderId,
    next: OrderStatus,
) -> Result<(), CliError> {
    app.orders.fetch_order_by_id(id).await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    state
        .current_order
        .as_ref()
        .map_or(Ok(()), |order| check_transition(order, next))
}

pub async fn cancel(app: &App, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    let order_id = OrderId::from(id);
    ensure_transition(app, &order_id, OrderStatus::Cancelled).await?;
    app.orders.cancel_order(&order_id).await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    writeln!(out, "Order {id} cancelled")?;
    render::orders(out, &state.orders)?;
    Ok(())
}

/// Build payment details from command-line flags.
pub fn payment_details(
    method: &str,
    number: Option<String>,
    expiry: Option<String>,
    cvv: Option<String>,
) -> Result<PaymentDetails, CliError> {
    let method: PaymentMethod = method.parse()?;
    if !method.requires_card() {
        return Ok(PaymentDetails {
            method,
            card_details: None,
        });
    }

    match (number, expiry, cvv) {
        (Some(number), Some(expiry), Some(cvv)) => Ok(PaymentDetails::card(CardDetails {
            number,
            expiry,
            cvv,
        })),
        _ => Err(CliError::InvalidArgument(
            "credit_card payments need --card-number, --expiry and --cvv".to_owned(),
        )),
    }
}

pub async fn pay(
    app: &App,
    id: &str,
    details: &PaymentDetails,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let paid = app.orders.process_payment(&OrderId::from(id), details).await;
    check(app.orders.snapshot().await.error)?;
    if paid {
        writeln!(out, "Order {id} paid by {}", details.method)?;
    }
    Ok(())
}
