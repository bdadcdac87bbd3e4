//! `reviews list|add|delete`.

use std::io::Write;

use tiffin_client::App;
use tiffin_core::{FoodItemId, Rating, ReviewId};

use super::{CliError, check};
use crate::render;

pub async fn list(app: &App, food_id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.reviews.fetch_reviews(&FoodItemId::from(food_id)).await;
    let state = app.reviews.snapshot().await;
    check(state.error.clone())?;
    render::reviews(out, &state)?;
    Ok(())
}

pub async fn add(
    app: &App,
    food_id: &str,
    rating: u8,
    content: &str,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let rating = Rating::new(rating)?;
    if content.trim().is_empty() {
        return Err(CliError::InvalidArgument("review text cannot be empty".to_owned()));
    }

    app.reviews
        .add_review(&FoodItemId::from(food_id), content, rating)
        .await;
    let state = app.reviews.snapshot().await;
    check(state.error.clone())?;
    render::reviews(out, &state)?;
    Ok(())
}

pub async fn delete(app: &App, id: &str, out: &mut impl Write) -> Result<(), CliError> {
    app.reviews.delete_review(&ReviewId::from(id)).await;
    check(app.reviews.snapshot().await.error)?;
    writeln!(out, "Review {id} deleted")?;
    Ok(())
}
