//! In-memory backend for store tests.
//!
//! Behaves like a single-tenant backend: carts per user, orders placed from
//! the cart, reviews per food item. Individual operations can be made to fail
//! or be held until released, and every call is counted.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;
use tiffin_core::{
    Address, AddressId, AuthSession, CartItem, Category, CategoryId, CategoryPatch, Credentials,
    Email, FoodItem, FoodItemId, FoodItemPatch, NewAddress, NewCategory, NewFoodItem, NewReview,
    Order, OrderId, OrderStatus, Payment, PaymentDetails, PaymentId, PaymentStatus, Price,
    Registration, Review, ReviewId, Role, User, UserId, UserPatch,
};
use tokio::sync::oneshot;

use super::IdentityProvider;
use crate::error::GatewayError;
use crate::gateway::{
    AddressApi, AdminApi, AuthApi, CartApi, CategoriesApi, FoodApi, OrdersApi, PaymentApi,
    ReviewsApi, UsersApi,
};

#[derive(Default)]
pub(crate) struct Data {
    pub(crate) users: Vec<(User, String)>,
    pub(crate) food: Vec<FoodItem>,
    pub(crate) categories: Vec<Category>,
    pub(crate) carts: HashMap<UserId, Vec<CartItem>>,
    pub(crate) orders: Vec<Order>,
    pub(crate) reviews: Vec<Review>,
    pub(crate) payments: Vec<Payment>,
    pub(crate) addresses: Vec<Address>,
    next_id: u64,
}

impl Data {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

#[derive(Default)]
pub(crate) struct FakeBackend {
    data: Mutex<Data>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
    held: Mutex<HashMap<&'static str, VecDeque<oneshot::Receiver<()>>>>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_user(&self, name: &str, email: &str, password: &str, role: Role) -> User {
        let mut data = self.data.lock().unwrap();
        let user = User {
            id: UserId::from(data.next_id()),
            name: name.to_owned(),
            email: Some(Email::parse(email).unwrap()),
            role,
        };
        data.users.push((user.clone(), password.to_owned()));
        user
    }

    pub(crate) fn with_food(
        &self,
        name: &str,
        description: &str,
        cents: i64,
        category: &str,
    ) -> FoodItem {
        let mut data = self.data.lock().unwrap();
        let item = FoodItem {
            id: FoodItemId::from(data.next_id()),
            name: name.to_owned(),
            description: description.to_owned(),
            price: Price::from_cents(cents),
            image: None,
            category: Some(category.to_owned()),
        };
        data.food.push(item.clone());
        item
    }

    pub(crate) fn with_category(&self, name: &str) -> Category {
        let mut data = self.data.lock().unwrap();
        let category = Category {
            id: CategoryId::from(data.next_id()),
            name: name.to_owned(),
            description: None,
        };
        data.categories.push(category.clone());
        category
    }

    pub(crate) fn with_review(&self, author: &User, food: &FoodItemId, rating: u8) -> Review {
        let mut data = self.data.lock().unwrap();
        let review = Review {
            id: ReviewId::from(data.next_id()),
            user_id: author.id.clone(),
            food_item_id: food.clone(),
            content: "Tasty".to_owned(),
            rating: tiffin_core::Rating::new(rating).unwrap(),
            user_name: author.name.clone(),
            created_at: None,
        };
        data.reviews.push(review.clone());
        review
    }

    /// Direct access to backend state.
    pub(crate) fn data(&self) -> std::sync::MutexGuard<'_, Data> {
        self.data.lock().unwrap()
    }

    /// Make every later call to `op` fail with a 500.
    pub(crate) fn fail(&self, op: &'static str) {
        self.failing.lock().unwrap().insert(op);
    }

    /// Hold the next call to `op` after it has read its result, until the
    /// returned sender fires or is dropped.
    pub(crate) fn hold(&self, op: &'static str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.held
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(rx);
        tx
    }

    pub(crate) fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn enter(&self, op: &'static str) -> Result<(), GatewayError> {
        *self.calls.lock().unwrap().entry(op).or_default() += 1;
        if self.failing.lock().unwrap().contains(op) {
            return Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, op));
        }
        Ok(())
    }

    async fn release(&self, op: &'static str) {
        let gate = self
            .held
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

fn api_error(status: StatusCode, message: &str) -> GatewayError {
    GatewayError::Api {
        status,
        message: message.to_owned(),
    }
}

fn not_found(what: &str) -> GatewayError {
    api_error(StatusCode::NOT_FOUND, what)
}

#[async_trait]
impl AuthApi for FakeBackend {
    async fn login(&self, credentials: &Credentials) -> Result<AuthSession, GatewayError> {
        self.enter("login")?;
        let session = {
            let data = self.data();
            data.users
                .iter()
                .find(|(user, password)| {
                    user.email.as_ref() == Some(&credentials.email)
                        && *password == credentials.password
                })
                .map(|(user, _)| AuthSession {
                    user: user.clone(),
                    token: format!("token-{}", user.id),
                })
        };
        self.release("login").await;
        session.ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "bad credentials"))
    }

    async fn register(&self, registration: &Registration) -> Result<AuthSession, GatewayError> {
        self.enter("register")?;
        let mut data = self.data();
        if data
            .users
            .iter()
            .any(|(user, _)| user.email.as_ref() == Some(&registration.email))
        {
            return Err(api_error(StatusCode::CONFLICT, "email taken"));
        }
        let user = User {
            id: UserId::from(data.next_id()),
            name: registration.name.clone(),
            email: Some(registration.email.clone()),
            role: Role::User,
        };
        data.users.push((user.clone(), registration.password.clone()));
        Ok(AuthSession {
            token: format!("token-{}", user.id),
            user,
        })
    }

    async fn logout(&self) -> Result<(), GatewayError> {
        self.enter("logout")
    }
}

#[async_trait]
impl UsersApi for FakeBackend {
    async fn get_user(&self, id: &UserId) -> Result<User, GatewayError> {
        self.enter("get_user")?;
        let found = self
            .data()
            .users
            .iter()
            .find(|(u, _)| u.id == *id)
            .map(|(u, _)| u.clone());
        self.release("get_user").await;
        found.ok_or_else(|| not_found("user"))
    }

    async fn update_user(&self, id: &UserId, patch: &UserPatch) -> Result<User, GatewayError> {
        self.enter("update_user")?;
        let mut data = self.data();
        let (user, _) = data
            .users
            .iter_mut()
            .find(|(u, _)| u.id == *id)
            .ok_or_else(|| not_found("user"))?;
        if let Some(name) = &patch.name {
            user.name.clone_from(name);
        }
        if patch.email.is_some() {
            user.email.clone_from(&patch.email);
        }
        Ok(user.clone())
    }

    async fn delete_account(&self, id: &UserId) -> Result<(), GatewayError> {
        self.enter("delete_account")?;
        self.data().users.retain(|(u, _)| u.id != *id);
        Ok(())
    }
}

#[async_trait]
impl AddressApi for FakeBackend {
    async fn addresses(&self, user_id: &UserId) -> Result<Vec<Address>, GatewayError> {
        self.enter("addresses")?;
        let addresses = self
            .data()
            .addresses
            .iter()
            .filter(|a| a.user_id == *user_id)
            .cloned()
            .collect();
        self.release("addresses").await;
        Ok(addresses)
    }

    async fn add_address(&self, address: &NewAddress) -> Result<Address, GatewayError> {
        self.enter("add_address")?;
        let mut data = self.data();
        let address = Address {
            id: AddressId::from(data.next_id()),
            user_id: address.user_id.clone(),
            street: address.street.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            zip_code: address.zip_code.clone(),
            country: address.country.clone(),
            is_default: address.is_default,
        };
        data.addresses.push(address.clone());
        Ok(address)
    }
}

#[async_trait]
impl AdminApi for FakeBackend {
    async fn all_users(&self) -> Result<Vec<User>, GatewayError> {
        self.enter("all_users")?;
        let users = self.data().users.iter().map(|(u, _)| u.clone()).collect();
        self.release("all_users").await;
        Ok(users)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), GatewayError> {
        self.enter("delete_user")?;
        self.data().users.retain(|(u, _)| u.id != *id);
        Ok(())
    }
}

#[async_trait]
impl FoodApi for FakeBackend {
    async fn list_food(&self) -> Result<Vec<FoodItem>, GatewayError> {
        self.enter("list_food")?;
        let food = self.data().food.clone();
        self.release("list_food").await;
        Ok(food)
    }

    async fn get_food(&self, id: &FoodItemId) -> Result<FoodItem, GatewayError> {
        self.enter("get_food")?;
        let found = self.data().food.iter().find(|f| f.id == *id).cloned();
        found.ok_or_else(|| not_found("food item"))
    }

    async fn add_food(&self, item: &NewFoodItem) -> Result<FoodItem, GatewayError> {
        self.enter("add_food")?;
        let mut data = self.data();
        let item = FoodItem {
            id: FoodItemId::from(data.next_id()),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            image: item.image.clone(),
            category: item.category.clone(),
        };
        data.food.push(item.clone());
        Ok(item)
    }

    async fn update_food(
        &self,
        id: &FoodItemId,
        patch: &FoodItemPatch,
    ) -> Result<FoodItemPatch, GatewayError> {
        self.enter("update_food")?;
        let mut data = self.data();
        let item = data
            .food
            .iter_mut()
            .find(|f| f.id == *id)
            .ok_or_else(|| not_found("food item"))?;
        item.apply(patch);
        Ok(patch.clone())
    }

    async fn delete_food(&self, id: &FoodItemId) -> Result<(), GatewayError> {
        self.enter("delete_food")?;
        self.data().food.retain(|f| f.id != *id);
        Ok(())
    }
}

#[async_trait]
impl CategoriesApi for FakeBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, GatewayError> {
        self.enter("list_categories")?;
        let categories = self.data().categories.clone();
        self.release("list_categories").await;
        Ok(categories)
    }

    async fn add_category(&self, category: &NewCategory) -> Result<Category, GatewayError> {
        self.enter("add_category")?;
        let mut data = self.data();
        let category = Category {
            id: CategoryId::from(data.next_id()),
            name: category.name.clone(),
            description: category.description.clone(),
        };
        data.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, GatewayError> {
        self.enter("update_category")?;
        let mut data = self.data();
        let category = data
            .categories
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| not_found("category"))?;
        if let Some(name) = &patch.name {
            category.name.clone_from(name);
        }
        if patch.description.is_some() {
            category.description.clone_from(&patch.description);
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &CategoryId) -> Result<(), GatewayError> {
        self.enter("delete_category")?;
        self.data().categories.retain(|c| c.id != *id);
        Ok(())
    }
}

#[async_trait]
impl CartApi for FakeBackend {
    async fn cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, GatewayError> {
        self.enter("cart_items")?;
        let items = self.data().carts.get(user_id).cloned().unwrap_or_default();
        self.release("cart_items").await;
        Ok(items)
    }

    async fn add_to_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError> {
        self.enter("add_to_cart")?;
        let mut data = self.data();
        let food = data
            .food
            .iter()
            .find(|f| f.id == *food_item_id)
            .cloned()
            .ok_or_else(|| not_found("food item"))?;
        let line_id = data.next_id();
        let cart = data.carts.entry(user_id.clone()).or_default();
        match cart.iter_mut().find(|line| line.food_item.id == food.id) {
            Some(line) => line.quantity += 1,
            None => cart.push(CartItem {
                id: line_id.into(),
                food_item: food,
                quantity: 1,
            }),
        }
        Ok(())
    }

    async fn remove_from_cart(
        &self,
        user_id: &UserId,
        food_item_id: &FoodItemId,
    ) -> Result<(), GatewayError> {
        self.enter("remove_from_cart")?;
        if let Some(cart) = self.data().carts.get_mut(user_id) {
            cart.retain(|line| line.food_item.id != *food_item_id);
        }
        Ok(())
    }

    async fn clear_cart(&self, user_id: &UserId) -> Result<(), GatewayError> {
        self.enter("clear_cart")?;
        self.data().carts.remove(user_id);
        Ok(())
    }
}

#[async_trait]
impl OrdersApi for FakeBackend {
    async fn all_orders(&self) -> Result<Vec<Order>, GatewayError> {
        self.enter("all_orders")?;
        let orders = self.data().orders.clone();
        self.release("all_orders").await;
        Ok(orders)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Order, GatewayError> {
        self.enter("get_order")?;
        let found = self.data().orders.iter().find(|o| o.id == *id).cloned();
        self.release("get_order").await;
        found.ok_or_else(|| not_found("order"))
    }

    async fn user_orders(&self, user_id: &UserId) -> Result<Vec<Order>, GatewayError> {
        self.enter("user_orders")?;
        let orders = self
            .data()
            .orders
            .iter()
            .filter(|o| o.user_id.as_ref() == Some(user_id))
            .cloned()
            .collect();
        self.release("user_orders").await;
        Ok(orders)
    }

    async fn place_order(&self, user_id: &UserId) -> Result<Order, GatewayError> {
        self.enter("place_order")?;
        let mut data = self.data();
        let items = data.carts.remove(user_id).unwrap_or_default();
        if items.is_empty() {
            return Err(api_error(StatusCode::BAD_REQUEST, "cart is empty"));
        }
        let order = Order {
            id: OrderId::from(data.next_id()),
            user_id: Some(user_id.clone()),
            total: items.iter().map(CartItem::line_total).sum(),
            items,
            status: OrderStatus::Pending,
            created_at: None,
        };
        data.orders.push(order.clone());
        Ok(order)
    }

    async fn cancel_order(&self, id: &OrderId) -> Result<(), GatewayError> {
        self.enter("cancel_order")?;
        let mut data = self.data();
        let order = data
            .orders
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| not_found("order"))?;
        order.status = OrderStatus::Cancelled;
        Ok(())
    }

    async fn update_order_status(
        &self,
        id: &OrderId,
        status: OrderStatus,
    ) -> Result<(), GatewayError> {
        self.enter("update_order_status")?;
        let mut data = self.data();
        let order = data
            .orders
            .iter_mut()
            .find(|o| o.id == *id)
            .ok_or_else(|| not_found("order"))?;
        order.status = status;
        Ok(())
    }
}

#[async_trait]
impl PaymentApi for FakeBackend {
    async fn charge(
        &self,
        order_id: &OrderId,
        details: &PaymentDetails,
    ) -> Result<(), GatewayError> {
        self.enter("charge")?;
        let mut data = self.data();
        let amount = data
            .orders
            .iter()
            .find(|o| o.id == *order_id)
            .map(|o| o.total)
            .ok_or_else(|| not_found("order"))?;
        let payment = Payment {
            id: PaymentId::from(data.next_id()),
            order_id: order_id.clone(),
            amount,
            status: PaymentStatus::Completed,
            method: details.method,
            created_at: None,
        };
        data.payments.push(payment);
        Ok(())
    }

    async fn payment_status(&self, order_id: &OrderId) -> Result<Payment, GatewayError> {
        self.enter("payment_status")?;
        let found = self
            .data()
            .payments
            .iter()
            .find(|p| p.order_id == *order_id)
            .cloned();
        found.ok_or_else(|| not_found("payment"))
    }
}

#[async_trait]
impl ReviewsApi for FakeBackend {
    async fn reviews_for(&self, food_item_id: &FoodItemId) -> Result<Vec<Review>, GatewayError> {
        self.enter("reviews_for")?;
        let reviews = self
            .data()
            .reviews
            .iter()
            .filter(|r| r.food_item_id == *food_item_id)
            .cloned()
            .collect();
        self.release("reviews_for").await;
        Ok(reviews)
    }

    async fn add_review(&self, review: &NewReview) -> Result<(), GatewayError> {
        self.enter("add_review")?;
        let mut data = self.data();
        let user_name = data
            .users
            .iter()
            .find(|(u, _)| u.id == review.user_id)
            .map(|(u, _)| u.name.clone())
            .unwrap_or_default();
        let review = Review {
            id: ReviewId::from(data.next_id()),
            user_id: review.user_id.clone(),
            food_item_id: review.food_item_id.clone(),
            content: review.content.clone(),
            rating: review.rating,
            user_name,
            created_at: None,
        };
        data.reviews.push(review);
        Ok(())
    }

    async fn delete_review(&self, id: &ReviewId) -> Result<(), GatewayError> {
        self.enter("delete_review")?;
        self.data().reviews.retain(|r| r.id != *id);
        Ok(())
    }
}

/// Identity fixed at construction.
pub(crate) struct StaticIdentity(pub(crate) Option<User>);

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user(&self) -> Option<User> {
        self.0.clone()
    }
}
