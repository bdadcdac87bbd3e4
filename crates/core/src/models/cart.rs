//! Cart lines.

use serde::{Deserialize, Serialize};

use crate::types::{CartItemId, Price};

use super::food::FoodItem;

const fn one() -> u32 {
    1
}

/// One line of a user's cart: a food item and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub food_item: FoodItem,
    #[serde(default = "one")]
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.food_item.price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_defaults_to_one() {
        let line: CartItem = serde_json::from_value(serde_json::json!({
            "id": 1,
            "foodItem": {"id": 7, "name": "Masala Dosa", "price": 6.25}
        }))
        .unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(line.line_total(), Price::from_cents(625));
    }

    #[test]
    fn test_line_total_multiplies() {
        let line: CartItem = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "foodItem": {"id": "f1", "name": "Samosa", "price": 1.5},
            "quantity": 4
        }))
        .unwrap();
        assert_eq!(line.line_total(), Price::from_cents(600));
    }
}
