//! `admin ...` commands. The caller signs in first; the backend enforces
//! that the account is an admin.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::{FoodItemId, FoodItemPatch, NewFoodItem, OrderId, OrderStatus, Price, UserId};

use super::{CliError, check};
use crate::render;

pub async fn users(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.auth.fetch_users().await;
    let state = app.auth.snapshot().await;
    check(state.error)?;
    render::users(out, &state.users)?;
    Ok(())
}

pub async fn orders(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.orders.fetch_all_orders().await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    render::orders(out, &state.orders)?;
    Ok(())
}

pub async fn set_status(
    app: &App,
    id: &str,
    status: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let status: OrderStatus = status.parse()?;
    let order_id = OrderId::from(id);
    super::orders::ensure_transition(app, &order_id, status).await?;
    app.orders.update_order_status(&order_id, status).await;
    let state = app.orders.snapshot().await;
    check(state.error)?;
    writeln!(out, "Order {id} is now {status}")?;
    render::orders(out, &state.orders)?;
    Ok(())
}

/// Build a new menu item from command-line flags.
pub fn new_food_item(
    name: String,
    description: String,
    price: &str,
    category: Option<String>,
    image: Option<String>,
) -> Result<NewFoodItem, CliError> {
    if name.trim().is_empty() {
        return Err(CliError::InvalidArgument("name cannot be empty".to_owned()));
    }
    Ok(NewFoodItem {
        name,
        description,
        price: price.parse::<Price>()?,
        image,
        category,
    })
}

/// Build a menu item patch from command-line flags.
pub fn food_patch(
    name: Option<String>,
    description: Option<String>,
    price: Option<&str>,
    category: Option<String>,
    image: Option<String>,
) -> Result<FoodItemPatch, CliError> {
    let patch = FoodItemPatch {
        name,
        description,
        price: price.map(str::parse::<Price>).transpose()?,
        image,
        category,
    };
    if patch.is_empty() {
        return Err(CliError::InvalidArgument("nothing to change".to_owned()));
    }
    Ok(patch)
}

pub async fn add_food(app: &App, item: &NewFoodItem, out: &mut impl Write) -> Result<(), CliError> {
    app.food.fetch_food_items().await;
    app.food.add_food_item(item).await;
    let state = app.food.snapshot().await;
    check(state.error)?;
    render::food_items(out, &state.items)?;
    Ok(())
}

pub async fn edit_food(
    app: &App,
    id: &str,
    patch: &FoodItemPatch,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let id = FoodItemId::from(id);
    app.food.fetch_food_items().await;
    app.food.edit_food_item(&id, patch).await;
    let state = app.food.snapshot().await;
    check(state.error)?;
    let edited: Vec<_> = state.items.into_iter().filter(|item| item.id == id).collect();
    render::food_items(out, &edited)?;
    Ok(())
}

pub async fn delete_food(app: &App, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.food.delete_food_item(&FoodItemId::from(id)).await;
    check(app.food.snapshot().await.error)?;
    writeln!(out, "Food item {id} deleted")?;
    Ok(())
}

pub async fn delete_user(app: &App, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.auth.delete_user(&UserId::from(id)).await;
    check(app.auth.snapshot().await.error)?;
    writeln!(out, "User {id} deleted")?;
    Ok(())
}
