//! Client-side projections of backend resources.
//!
//! These are the shapes the backend returns and accepts. The client never owns
//! their lifecycle: every collection is refetched or patched from a server
//! response. JSON field names are camelCase.

pub mod account;
pub mod cart;
pub mod food;
pub mod order;
pub mod payment;
pub mod review;
pub mod user;

pub use account::{Address, AddressDetails, NewAddress, Notification};
pub use cart::CartItem;
pub use food::{Category, CategoryPatch, FoodItem, FoodItemPatch, NewCategory, NewFoodItem};
pub use order::Order;
pub use payment::{CardDetails, Payment, PaymentDetails};
pub use review::{NewReview, Review, average_rating};
pub use user::{AuthSession, User, UserPatch};
