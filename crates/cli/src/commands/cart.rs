//! `cart show|add|remove|clear|checkout`. The caller signs in first.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::FoodItemId;

use super::{CliError, check};
use crate::render;

pub async fn show(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.cart.fetch_cart_items().await;
    let state = app.cart.snapshot().await;
    check(state.error.clone())?;
    render::cart(out, &state)?;
    Ok(())
}

pub async fn add(app: &App, food_id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.cart.add_to_cart(&FoodItemId::from(food_id)).await;
    let state = app.cart.snapshot().await;
    check(state.error.clone())?;
    render::cart(out, &state)?;
    Ok(())
}

pub async fn remove(app: &App, food_id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.cart.remove_from_cart(&FoodItemId::from(food_id)).await;
    let state = app.cart.snapshot().await;
    check(state.error.clone())?;
    render::cart(out, &state)?;
    Ok(())
}

pub async fn clear(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.cart.clear_cart().await;
    check(app.cart.snapshot().await.error)?;
    writeln!(out, "Cart cleared")?;
    Ok(())
}

pub async fn checkout(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    // Checkout works from the local cart, so load it first.
    app.cart.fetch_cart_items().await;
    check(app.cart.snapshot().await.error)?;

    match app.cart.checkout().await {
        Some(order_id) => writeln!(out, "Order {order_id} placed")?,
        None => {
            check(app.cart.snapshot().await.error)?;
            writeln!(out, "Your cart is empty")?;
        }
    }
    Ok(())
}
