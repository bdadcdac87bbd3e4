//! Food item reviews.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{FoodItemId, Rating, ReviewId, UserId};

/// A user's review of a food item. Reviews are created and deleted, never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    pub food_item_id: FoodItemId,
    #[serde(default)]
    pub content: String,
    pub rating: Rating,
    /// Reviewer display name, denormalized by the backend.
    #[serde(default)]
    pub user_name: String,
    #[serde(
        default,
        with = "crate::types::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of a review submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: UserId,
    pub food_item_id: FoodItemId,
    pub content: String,
    pub rating: Rating,
}

/// Mean rating of a set of reviews, or `None` when there are none.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating.value())).sum();
    #[allow(clippy::cast_precision_loss)] // review counts never approach f64 precision
    Some(f64::from(total) / reviews.len() as f64)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn review(id: &str, stars: u8) -> Review {
        Review {
            id: ReviewId::new(id),
            user_id: UserId::new("u1"),
            food_item_id: FoodItemId::new("f1"),
            content: String::new(),
            rating: Rating::new(stars).unwrap(),
            user_name: "Meera".to_owned(),
            created_at: None,
        }
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), None);
        let avg = average_rating(&[review("r1", 5), review("r2", 2)]).unwrap();
        assert!((avg - 3.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let result = serde_json::from_value::<Review>(serde_json::json!({
            "id": 1, "userId": 1, "foodItemId": 1, "rating": 0
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_review_wire_shape() {
        let body = NewReview {
            user_id: UserId::new("u1"),
            food_item_id: FoodItemId::new("f9"),
            content: "Crisp and hot".to_owned(),
            rating: Rating::new(4).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({
                "userId": "u1",
                "foodItemId": "f9",
                "content": "Crisp and hot",
                "rating": 4
            })
        );
    }
}
