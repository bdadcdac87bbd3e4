//! `menu`, `categories`.

use std::io::Write;

use tiffin_client::App;

use super::{CliError, check};
use crate::render;

pub async fn menu(
    app: &App,
    query: &str,
    category: Option<String>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    app.food.fetch_food_items().await;
    check(app.food.snapshot().await.error)?;

    app.food.set_selected_category(category).await;
    let items = app.food.menu(query).await;
    render::food_items(out, &items)?;
    Ok(())
}

pub async fn categories(app: &App, out: &mut impl Write) -> Result<(), CliError> {
    app.food.fetch_categories().await;
    let state = app.food.snapshot().await;
    check(state.error)?;
    render::categories(out, &state.categories)?;
    Ok(())
}
