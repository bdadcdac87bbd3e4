//! Integration tests for Tiffin.
//!
//! Provides [`MockServer`], an in-process stand-in for the food-ordering
//! backend served over real HTTP on an ephemeral port. It speaks the backend's
//! wire dialect: integer IDs, `username` for the account email, uppercase
//! roles and statuses, zone-less timestamps, and prices as JSON doubles.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tiffin-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - Request plumbing: bearer token, request IDs, endpoints
//! - `stores` - Store behavior end to end against the mock backend

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::extract::{OriginalUri, Path, Query, Request, State};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Timestamp stamped on everything the mock creates.
pub const CREATED_AT: &str = "2026-01-02T10:00:00";

type Reply<T> = Result<Json<T>, StatusCode>;

/// One request as the mock saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    /// Path including the `/api` prefix, with the query string.
    pub path: String,
    pub authorization: Option<String>,
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockUser {
    id: i64,
    name: String,
    username: String,
    #[serde(skip)]
    password: String,
    role: &'static str,
}

impl MockUser {
    fn is_admin(&self) -> bool {
        self.role == "ADMIN"
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockFood {
    id: i64,
    name: String,
    description: String,
    price: f64,
    image_url: Option<String>,
    category: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockCartLine {
    id: i64,
    food_item: MockFood,
    quantity: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockOrder {
    id: i64,
    user_id: i64,
    items: Vec<MockCartLine>,
    total: f64,
    status: String,
    date_time: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockReview {
    id: i64,
    user_id: i64,
    food_item_id: i64,
    content: String,
    rating: u8,
    user_name: String,
    created_at: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockPayment {
    id: i64,
    order_id: i64,
    amount: f64,
    status: &'static str,
    method: String,
    created_at: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockCategory {
    id: i64,
    name: String,
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct MockAddress {
    id: i64,
    user_id: i64,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    is_default: bool,
}

#[derive(Default)]
struct MockState {
    users: Vec<MockUser>,
    food: Vec<MockFood>,
    categories: Vec<MockCategory>,
    carts: HashMap<i64, Vec<MockCartLine>>,
    orders: Vec<MockOrder>,
    reviews: Vec<MockReview>,
    payments: Vec<MockPayment>,
    addresses: Vec<MockAddress>,
    notifications: Vec<(i64, String)>,
    sessions: HashMap<String, i64>,
    requests: Vec<RecordedRequest>,
    failing: HashSet<String>,
    next_id: i64,
}

impl MockState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// The user a bearer token belongs to.
    fn caller(&self, headers: &HeaderMap) -> Result<MockUser, StatusCode> {
        let token = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;
        let user_id = self.sessions.get(token).ok_or(StatusCode::UNAUTHORIZED)?;
        self.users
            .iter()
            .find(|u| u.id == *user_id)
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }

    fn admin(&self, headers: &HeaderMap) -> Result<MockUser, StatusCode> {
        let user = self.caller(headers)?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(StatusCode::FORBIDDEN)
        }
    }

    /// The caller, if they are `user_id` or an admin.
    fn owner(&self, headers: &HeaderMap, user_id: i64) -> Result<MockUser, StatusCode> {
        let user = self.caller(headers)?;
        if user.id == user_id || user.is_admin() {
            Ok(user)
        } else {
            Err(StatusCode::FORBIDDEN)
        }
    }

    fn session_for(&mut self, user: MockUser) -> Value {
        let token = format!("mock-token-{}-{}", user.id, self.next_id());
        self.sessions.insert(token.clone(), user.id);
        json!({ "user": user, "token": token })
    }
}

/// Handle to the shared mock state.
#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add an account and return its ID.
    pub fn seed_user(&self, name: &str, email: &str, password: &str, admin: bool) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.users.push(MockUser {
            id,
            name: name.to_owned(),
            username: email.to_owned(),
            password: password.to_owned(),
            role: if admin { "ADMIN" } else { "USER" },
        });
        id
    }

    /// Add a menu item and return its ID.
    pub fn seed_food(&self, name: &str, description: &str, price: f64, category: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.food.push(MockFood {
            id,
            name: name.to_owned(),
            description: description.to_owned(),
            price,
            image_url: None,
            category: Some(category.to_owned()),
        });
        id
    }

    /// Add a category and return its ID.
    pub fn seed_category(&self, name: &str) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.categories.push(MockCategory {
            id,
            name: name.to_owned(),
            description: None,
        });
        id
    }

    /// Answer every request to `path` (with the `/api` prefix, without query)
    /// with a 500.
    pub fn fail_path(&self, path: &str) {
        self.lock().failing.insert(path.to_owned());
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.lock().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.lock().requests.clear();
    }

    pub fn food_ids(&self) -> Vec<i64> {
        self.lock().food.iter().map(|f| f.id).collect()
    }

    /// `(food item ID, quantity)` for each line of a user's cart.
    pub fn cart_lines(&self, user_id: i64) -> Vec<(i64, u32)> {
        self.lock()
            .carts
            .get(&user_id)
            .map(|lines| lines.iter().map(|l| (l.food_item.id, l.quantity)).collect())
            .unwrap_or_default()
    }

    /// `(order ID, status)` for every order.
    pub fn order_statuses(&self) -> Vec<(i64, String)> {
        self.lock()
            .orders
            .iter()
            .map(|o| (o.id, o.status.clone()))
            .collect()
    }

    pub fn review_count(&self) -> usize {
        self.lock().reviews.len()
    }

    pub fn notifications(&self) -> Vec<(i64, String)> {
        self.lock().notifications.clone()
    }

    fn router(&self) -> Router {
        let api = Router::new()
            .route("/auth/login", post(login))
            .route("/auth/register", post(register))
            .route("/auth/logout", post(logout))
            .route("/users/{id}", get(get_user))
            .route("/users/update/{id}", put(update_user))
            .route("/users/delete/{id}", delete(delete_account))
            .route("/food/all", get(list_food))
            .route("/food/add", post(add_food))
            .route("/food/{id}", get(get_food))
            .route("/food/update/{id}", put(update_food))
            .route("/food/delete/{id}", delete(delete_food))
            .route("/cart/items/{user}", get(cart_items))
            .route("/cart/add", post(cart_add))
            .route("/cart/remove", post(cart_remove))
            .route("/cart/clear/{user}", post(cart_clear))
            .route("/orders", get(all_orders))
            .route("/orders/{id}", get(get_order).delete(cancel_order))
            .route("/orders/user/{user}", get(user_orders))
            .route("/orders/place/{user}", post(place_order))
            .route("/orders/{id}/status", put(update_status))
            .route("/admin/users/all", get(all_users))
            .route("/admin/user/delete/{id}", delete(admin_delete_user))
            .route("/payment/charge", post(charge))
            .route("/payment/status/{order}", get(payment_status))
            .route("/reviews/add", post(add_review))
            .route("/reviews/{food}", get(reviews_for))
            .route("/reviews/delete/{id}", delete(delete_review))
            .route("/categories/all", get(list_categories))
            .route("/categories/add", post(add_category))
            .route("/categories/update/{id}", put(update_category))
            .route("/categories/delete/{id}", delete(delete_category))
            .route("/address/add", post(add_address))
            .route("/address/{user}", get(addresses))
            .route("/notifications/send", post(send_notification))
            .layer(middleware::from_fn_with_state(self.clone(), record));

        Router::new().nest("/api", api).with_state(self.clone())
    }
}

/// A running mock backend.
pub struct MockServer {
    pub backend: MockBackend,
    /// Base URL including the `/api` prefix.
    pub base_url: String,
    task: tokio::task::JoinHandle<()>,
}

impl MockServer {
    /// Serve an empty backend on `127.0.0.1` with an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let backend = MockBackend::default();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = backend.router();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            backend,
            base_url: format!("http://{addr}/api"),
            task,
        }
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

// =============================================================================
// Middleware
// =============================================================================

async fn record(State(backend): State<MockBackend>, request: Request, next: Next) -> Response {
    // Nesting strips `/api` from the request URI; record what the client sent.
    let uri = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().clone(), |original| original.0.clone());
    let path = uri.path().to_owned();
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| path.clone(), |pq| pq.as_str().to_owned());
    let failing = {
        let header_value = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        let mut state = backend.lock();
        state.requests.push(RecordedRequest {
            method: request.method().clone(),
            path: path_and_query,
            authorization: header_value(header::AUTHORIZATION.as_str()),
            request_id: header_value("x-request-id"),
        });
        state.failing.contains(&path)
    };

    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "injected failure").into_response();
    }
    next.run(request).await
}

// =============================================================================
// Auth and users
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    password: String,
    #[serde(default)]
    name: String,
}

async fn login(State(backend): State<MockBackend>, Json(body): Json<LoginBody>) -> Reply<Value> {
    let mut state = backend.lock();
    let user = state
        .users
        .iter()
        .find(|u| u.username == body.username && u.password == body.password)
        .cloned()
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(state.session_for(user)))
}

async fn register(
    State(backend): State<MockBackend>,
    Json(body): Json<RegisterBody>,
) -> Reply<Value> {
    let mut state = backend.lock();
    if state.users.iter().any(|u| u.username == body.username) {
        return Err(StatusCode::CONFLICT);
    }
    let user = MockUser {
        id: state.next_id(),
        name: body.name,
        username: body.username,
        password: body.password,
        role: "USER",
    };
    state.users.push(user.clone());
    Ok(Json(state.session_for(user)))
}

async fn logout(State(backend): State<MockBackend>, headers: HeaderMap) -> StatusCode {
    let mut state = backend.lock();
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        state.sessions.remove(token);
    }
    StatusCode::OK
}

async fn get_user(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<MockUser> {
    let state = backend.lock();
    state.owner(&headers, id)?;
    state
        .users
        .iter()
        .find(|u| u.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_user(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Reply<MockUser> {
    let mut state = backend.lock();
    state.owner(&headers, id)?;
    let user = state
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = body.get("name").and_then(Value::as_str) {
        name.clone_into(&mut user.name);
    }
    if let Some(email) = body.get("email").and_then(Value::as_str) {
        email.clone_into(&mut user.username);
    }
    Ok(Json(user.clone()))
}

async fn delete_account(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.owner(&headers, id)?;
    state.users.retain(|u| u.id != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn all_users(State(backend): State<MockBackend>, headers: HeaderMap) -> Reply<Vec<MockUser>> {
    let state = backend.lock();
    state.admin(&headers)?;
    Ok(Json(state.users.clone()))
}

async fn admin_delete_user(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<String, StatusCode> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    state.users.retain(|u| u.id != id);
    Ok("User deleted".to_owned())
}

// =============================================================================
// Food and categories
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodBody {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    #[serde(alias = "image")]
    image_url: Option<String>,
    category: Option<String>,
}

async fn list_food(State(backend): State<MockBackend>) -> Json<Vec<MockFood>> {
    Json(backend.lock().food.clone())
}

async fn get_food(State(backend): State<MockBackend>, Path(id): Path<i64>) -> Reply<MockFood> {
    backend
        .lock()
        .food
        .iter()
        .find(|f| f.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn add_food(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<FoodBody>,
) -> Reply<MockFood> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    let food = MockFood {
        id: state.next_id(),
        name: body.name.ok_or(StatusCode::BAD_REQUEST)?,
        description: body.description.unwrap_or_default(),
        price: body.price.ok_or(StatusCode::BAD_REQUEST)?,
        image_url: body.image_url,
        category: body.category,
    };
    state.food.push(food.clone());
    Ok(Json(food))
}

async fn update_food(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<FoodBody>,
) -> Reply<MockFood> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    let food = state
        .food
        .iter_mut()
        .find(|f| f.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = body.name {
        food.name = name;
    }
    if let Some(description) = body.description {
        food.description = description;
    }
    if let Some(price) = body.price {
        food.price = price;
    }
    if body.image_url.is_some() {
        food.image_url = body.image_url;
    }
    if body.category.is_some() {
        food.category = body.category;
    }
    Ok(Json(food.clone()))
}

async fn delete_food(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    state.food.retain(|f| f.id != id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct CategoryBody {
    name: Option<String>,
    description: Option<String>,
}

async fn list_categories(State(backend): State<MockBackend>) -> Json<Vec<MockCategory>> {
    Json(backend.lock().categories.clone())
}

async fn add_category(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<CategoryBody>,
) -> Reply<MockCategory> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    let category = MockCategory {
        id: state.next_id(),
        name: body.name.ok_or(StatusCode::BAD_REQUEST)?,
        description: body.description,
    };
    state.categories.push(category.clone());
    Ok(Json(category))
}

async fn update_category(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<CategoryBody>,
) -> Reply<MockCategory> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    let category = state
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = body.name {
        category.name = name;
    }
    if body.description.is_some() {
        category.description = body.description;
    }
    Ok(Json(category.clone()))
}

async fn delete_category(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    state.categories.retain(|c| c.id != id);
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Cart
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartParams {
    user_id: i64,
    food_item_id: i64,
}

async fn cart_items(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(user): Path<i64>,
) -> Reply<Vec<MockCartLine>> {
    let state = backend.lock();
    state.owner(&headers, user)?;
    Ok(Json(state.carts.get(&user).cloned().unwrap_or_default()))
}

async fn cart_add(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(params): Query<CartParams>,
) -> Reply<Vec<MockCartLine>> {
    let mut state = backend.lock();
    state.owner(&headers, params.user_id)?;
    let food = state
        .food
        .iter()
        .find(|f| f.id == params.food_item_id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    let line_id = state.next_id();
    let cart = state.carts.entry(params.user_id).or_default();
    match cart.iter_mut().find(|l| l.food_item.id == food.id) {
        Some(line) => line.quantity += 1,
        None => cart.push(MockCartLine {
            id: line_id,
            food_item: food,
            quantity: 1,
        }),
    }
    Ok(Json(cart.clone()))
}

async fn cart_remove(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Query(params): Query<CartParams>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.owner(&headers, params.user_id)?;
    if let Some(cart) = state.carts.get_mut(&params.user_id) {
        cart.retain(|l| l.food_item.id != params.food_item_id);
    }
    Ok(StatusCode::OK)
}

async fn cart_clear(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(user): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.owner(&headers, user)?;
    state.carts.remove(&user);
    Ok(StatusCode::OK)
}

// =============================================================================
// Orders and payments
// =============================================================================

async fn all_orders(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
) -> Reply<Vec<MockOrder>> {
    let state = backend.lock();
    state.admin(&headers)?;
    Ok(Json(state.orders.clone()))
}

async fn get_order(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Reply<MockOrder> {
    let state = backend.lock();
    let order = state
        .orders
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    state.owner(&headers, order.user_id)?;
    Ok(Json(order))
}

async fn user_orders(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(user): Path<i64>,
) -> Reply<Vec<MockOrder>> {
    let state = backend.lock();
    state.owner(&headers, user)?;
    Ok(Json(
        state
            .orders
            .iter()
            .filter(|o| o.user_id == user)
            .cloned()
            .collect(),
    ))
}

async fn place_order(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(user): Path<i64>,
) -> Reply<MockOrder> {
    let mut state = backend.lock();
    state.owner(&headers, user)?;
    let items = state.carts.remove(&user).unwrap_or_default();
    if items.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let total = items
        .iter()
        .map(|l| l.food_item.price * f64::from(l.quantity))
        .sum();
    let order = MockOrder {
        id: state.next_id(),
        user_id: user,
        items,
        total,
        status: "PENDING".to_owned(),
        date_time: CREATED_AT,
    };
    state.orders.push(order.clone());
    Ok(Json(order))
}

async fn cancel_order(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    let owner = state
        .orders
        .iter()
        .find(|o| o.id == id)
        .map(|o| o.user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    state.owner(&headers, owner)?;
    if let Some(order) = state.orders.iter_mut().find(|o| o.id == id) {
        "CANCELLED".clone_into(&mut order.status);
    }
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
struct StatusBody {
    status: String,
}

async fn update_status(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<StatusBody>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.admin(&headers)?;
    let status = body.status.to_uppercase();
    if !matches!(
        status.as_str(),
        "PENDING" | "PROCESSING" | "DELIVERED" | "CANCELLED"
    ) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let order = state
        .orders
        .iter_mut()
        .find(|o| o.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    order.status = status;
    Ok(StatusCode::OK)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChargeBody {
    order_id: String,
    method: String,
    card_details: Option<Value>,
}

async fn charge(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<ChargeBody>,
) -> Reply<Value> {
    let mut state = backend.lock();
    state.caller(&headers)?;
    if body.method == "credit_card" && body.card_details.is_none() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let order_id: i64 = body.order_id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let amount = state
        .orders
        .iter()
        .find(|o| o.id == order_id)
        .map(|o| o.total)
        .ok_or(StatusCode::NOT_FOUND)?;
    let payment = MockPayment {
        id: state.next_id(),
        order_id,
        amount,
        status: "completed",
        method: body.method,
        created_at: CREATED_AT,
    };
    state.payments.push(payment);
    Ok(Json(json!({ "success": true })))
}

async fn payment_status(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(order): Path<i64>,
) -> Reply<MockPayment> {
    let state = backend.lock();
    state.caller(&headers)?;
    state
        .payments
        .iter()
        .find(|p| p.order_id == order)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

// =============================================================================
// Reviews, addresses, notifications
// =============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewBody {
    user_id: String,
    food_item_id: String,
    content: String,
    rating: u8,
}

async fn reviews_for(
    State(backend): State<MockBackend>,
    Path(food): Path<i64>,
) -> Json<Vec<MockReview>> {
    Json(
        backend
            .lock()
            .reviews
            .iter()
            .filter(|r| r.food_item_id == food)
            .cloned()
            .collect(),
    )
}

async fn add_review(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    let author = state.caller(&headers)?;
    let user_id: i64 = body.user_id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let food_item_id: i64 = body
        .food_item_id
        .parse()
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    if user_id != author.id || !(1..=5).contains(&body.rating) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let review = MockReview {
        id: state.next_id(),
        user_id,
        food_item_id,
        content: body.content,
        rating: body.rating,
        user_name: author.name,
        created_at: CREATED_AT,
    };
    state.reviews.push(review);
    Ok(StatusCode::CREATED)
}

async fn delete_review(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    let caller = state.caller(&headers)?;
    let author = state
        .reviews
        .iter()
        .find(|r| r.id == id)
        .map(|r| r.user_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    if author != caller.id && !caller.is_admin() {
        return Err(StatusCode::FORBIDDEN);
    }
    state.reviews.retain(|r| r.id != id);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddressBody {
    user_id: String,
    street: String,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    #[serde(default)]
    is_default: bool,
}

async fn addresses(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Path(user): Path<i64>,
) -> Reply<Vec<MockAddress>> {
    let state = backend.lock();
    state.owner(&headers, user)?;
    Ok(Json(
        state
            .addresses
            .iter()
            .filter(|a| a.user_id == user)
            .cloned()
            .collect(),
    ))
}

async fn add_address(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<AddressBody>,
) -> Reply<MockAddress> {
    let mut state = backend.lock();
    let user_id: i64 = body.user_id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    state.owner(&headers, user_id)?;
    let address = MockAddress {
        id: state.next_id(),
        user_id,
        street: body.street,
        city: body.city,
        state: body.state,
        zip_code: body.zip_code,
        country: body.country,
        is_default: body.is_default,
    };
    state.addresses.push(address.clone());
    Ok(Json(address))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationBody {
    user_id: String,
    message: String,
}

async fn send_notification(
    State(backend): State<MockBackend>,
    headers: HeaderMap,
    Json(body): Json<NotificationBody>,
) -> Result<StatusCode, StatusCode> {
    let mut state = backend.lock();
    state.caller(&headers)?;
    let user_id: i64 = body.user_id.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    state.notifications.push((user_id, body.message));
    Ok(StatusCode::OK)
}
