//! Plain-text rendering of store snapshots.

use std::io::{self, Write};

use tiffin_client::stores::{CartState, ReviewsState};
use tiffin_core::{Address, Category, FoodItem, Order, User};

pub fn food_items(out: &mut impl Write, items: &[FoodItem]) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "No dishes found");
    }
    for item in items {
        writeln!(
            out,
            "{:>6}  {:<32} {:>9}  {}",
            item.id,
            item.name,
            item.price.to_string(),
            item.category.as_deref().unwrap_or("-"),
        )?;
        if !item.description.is_empty() {
            writeln!(out, "        {}", item.description)?;
        }
    }
    Ok(())
}

pub fn categories(out: &mut impl Write, categories: &[Category]) -> io::Result<()> {
    for category in categories {
        match &category.description {
            Some(description) => writeln!(out, "{}  {}", category.name, description)?,
            None => writeln!(out, "{}", category.name)?,
        }
    }
    Ok(())
}

pub fn cart(out: &mut impl Write, state: &CartState) -> io::Result<()> {
    if state.items.is_empty() {
        return writeln!(out, "Your cart is empty");
    }
    for line in &state.items {
        writeln!(
            out,
            "{:>3} x {:<32} {:>9}",
            line.quantity,
            line.food_item.name,
            line.line_total().to_string(),
        )?;
    }
    writeln!(
        out,
        "{} item(s), total {}",
        state.item_count(),
        state.total()
    )
}

pub fn orders(out: &mut impl Write, orders: &[Order]) -> io::Result<()> {
    if orders.is_empty() {
        return writeln!(out, "No orders yet");
    }
    for order in orders {
        let placed = order
            .created_at
            .map_or_else(|| "-".to_owned(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        writeln!(
            out,
            "#{:<6} {:<11} {:>9}  {:>3} item(s)  {}",
            order.id,
            order.status.to_string(),
            order.total.to_string(),
            order.item_count(),
            placed,
        )?;
    }
    Ok(())
}

pub fn order(out: &mut impl Write, order: &Order) -> io::Result<()> {
    writeln!(out, "Order #{} ({})", order.id, order.status)?;
    for line in &order.items {
        writeln!(
            out,
            "{:>3} x {:<32} {:>9}",
            line.quantity,
            line.food_item.name,
            line.line_total().to_string(),
        )?;
    }
    writeln!(out, "Total {}", order.total)
}

pub fn reviews(out: &mut impl Write, state: &ReviewsState) -> io::Result<()> {
    if state.reviews.is_empty() {
        return writeln!(out, "No reviews yet");
    }
    if let Some(average) = state.average() {
        writeln!(out, "Average {average:.1}/5 from {} review(s)", state.reviews.len())?;
    }
    for review in &state.reviews {
        writeln!(
            out,
            "[{}] {} - {}: {}",
            review.id, review.rating, review.user_name, review.content
        )?;
    }
    Ok(())
}

pub fn users(out: &mut impl Write, users: &[User]) -> io::Result<()> {
    for user in users {
        writeln!(
            out,
            "{:>6}  {:<24} {}",
            user.id,
            user.display_name(),
            user.email.as_ref().map_or("-", |email| email.as_str()),
        )?;
    }
    Ok(())
}

pub fn profile(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "{} (#{}, {})", user.display_name(), user.id, user.role)?;
    writeln!(
        out,
        "Email: {}",
        user.email.as_ref().map_or("-", |email| email.as_str())
    )
}

pub fn addresses(out: &mut impl Write, addresses: &[Address]) -> io::Result<()> {
    if addresses.is_empty() {
        return writeln!(out, "No saved addresses");
    }
    for address in addresses {
        writeln!(
            out,
            "[{}] {}, {}, {} {}, {}{}",
            address.id,
            address.street,
            address.city,
            address.state,
            address.zip_code,
            address.country,
            if address.is_default { " (default)" } else { "" },
        )?;
    }
    Ok(())
}
