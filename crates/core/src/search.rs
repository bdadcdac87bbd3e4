//! Lenient menu search.
//!
//! Matching is two-tier and deliberately permissive:
//!
//! 1. the lowercased field contains the whole lowercased query, or
//! 2. the lowercased field contains any whitespace-separated query token longer
//!    than [`MIN_TOKEN_LEN`] characters.
//!
//! There is no ranking, stemming, or edit-distance tolerance. Short tokens are
//! ignored in tier 2 so that words like "a" or "to" do not match everything.

use crate::models::FoodItem;

/// Tokens must be longer than this to match on their own.
pub const MIN_TOKEN_LEN: usize = 2;

/// Whether `field` leniently matches `query`.
///
/// An empty field or query never matches.
///
/// ```
/// use tiffin_core::lenient_match;
///
/// assert!(lenient_match("Tikka Biryani", "chicken tikka"));
/// assert!(!lenient_match("Silken tofu", "go to"));
/// ```
#[must_use]
pub fn lenient_match(field: &str, query: &str) -> bool {
    if field.is_empty() || query.is_empty() {
        return false;
    }

    let field = field.to_lowercase();
    let query = query.to_lowercase();

    if field.contains(&query) {
        return true;
    }

    query
        .split_whitespace()
        .any(|token| token.chars().count() > MIN_TOKEN_LEN && field.contains(token))
}

/// Menu filter: an optional category plus an optional search query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuFilter {
    /// Only items in this category, when set.
    pub category: Option<String>,
    /// Search text; blank means no text filtering.
    pub query: String,
}

impl MenuFilter {
    /// Filter with a search query and no category.
    #[must_use]
    pub fn query(query: impl Into<String>) -> Self {
        Self {
            category: None,
            query: query.into(),
        }
    }

    /// Restrict to a category.
    #[must_use]
    pub fn in_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    /// Whether `item` passes the filter.
    ///
    /// The category must match exactly when set. A non-blank query must
    /// leniently match the item's name or description.
    #[must_use]
    pub fn matches(&self, item: &FoodItem) -> bool {
        if let Some(category) = &self.category
            && item.category.as_deref() != Some(category.as_str())
        {
            return false;
        }

        if self.query.trim().is_empty() {
            return true;
        }

        lenient_match(&item.name, &self.query) || lenient_match(&item.description, &self.query)
    }

    /// Items passing the filter, in their original order.
    #[must_use]
    pub fn apply(&self, items: &[FoodItem]) -> Vec<FoodItem> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}
