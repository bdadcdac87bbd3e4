//! Gateway request plumbing against the mock backend.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use secrecy::SecretString;
use tiffin_client::gateway::{
    AddressApi, AuthApi, CartApi, CategoriesApi, FoodApi, NotificationsApi, OrdersApi, PaymentApi,
    ReviewsApi, UsersApi,
};
use tiffin_client::{ClientConfig, Gateway, GatewayError, MemoryTokenStore, TokenStore};
use tiffin_core::{
    AddressDetails, CategoryId, CategoryPatch, Credentials, Email, FoodItemId, NewAddress,
    NewCategory, OrderStatus, PaymentDetails, UserId, UserPatch,
};
use tiffin_integration_tests::MockServer;

fn gateway(server: &MockServer, tokens: Arc<dyn TokenStore>) -> Gateway {
    let config = ClientConfig::for_base_url(&server.base_url).unwrap();
    Gateway::new(&config, tokens).unwrap()
}

/// A gateway signed in as `email`.
async fn signed_in(server: &MockServer, email: &str) -> Gateway {
    let gateway = gateway(server, Arc::new(MemoryTokenStore::new()));
    let session = gateway
        .login(&Credentials::new(Email::parse(email).unwrap(), "pw"))
        .await
        .unwrap();
    gateway
        .token_store()
        .save(&SecretString::from(session.token))
        .await
        .unwrap();
    gateway
}

#[tokio::test]
async fn test_public_call_has_no_authorization() {
    let server = MockServer::start().await;
    server.backend.seed_food("Samosa", "Potato pastry", 2.5, "Snacks");
    let gateway = gateway(&server, Arc::new(MemoryTokenStore::new()));

    let food = gateway.list_food().await.unwrap();

    assert_eq!(food.len(), 1);
    assert_eq!(food[0].name, "Samosa");
    assert_eq!(food[0].price.to_string(), "$2.50");

    let requests = server.backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/api/food/all");
    assert!(requests[0].authorization.is_none());
}

#[tokio::test]
async fn test_every_request_carries_a_fresh_request_id() {
    let server = MockServer::start().await;
    let gateway = gateway(&server, Arc::new(MemoryTokenStore::new()));

    gateway.list_food().await.unwrap();
    gateway.list_food().await.unwrap();

    let ids: Vec<_> = server
        .backend
        .requests()
        .into_iter()
        .map(|r| r.request_id.unwrap())
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_login_then_bearer_token_is_attached() {
    let server = MockServer::start().await;
    let user_id = server
        .backend
        .seed_user("Asha", "asha@example.com", "pw", false);
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let gateway = gateway(&server, Arc::clone(&tokens));

    let session = gateway
        .login(&Credentials::new(
            Email::parse("asha@example.com").unwrap(),
            "pw",
        ))
        .await
        .unwrap();
    assert_eq!(session.user.id, UserId::from(user_id.to_string()));
    assert_eq!(session.user.name, "Asha");
    assert!(!session.user.is_admin());

    tokens
        .save(&SecretString::from(session.token.clone()))
        .await
        .unwrap();
    let items = gateway.cart_items(&session.user.id).await.unwrap();
    assert!(items.is_empty());

    let last = server.backend.requests().pop().unwrap();
    assert_eq!(
        last.authorization.as_deref(),
        Some(format!("Bearer {}", session.token).as_str())
    );
}

#[tokio::test]
async fn test_non_2xx_becomes_api_error() {
    let server = MockServer::start().await;
    let gateway = gateway(&server, Arc::new(MemoryTokenStore::new()));

    let err = gateway
        .login(&Credentials::new(
            Email::parse("nobody@example.com").unwrap(),
            "wrong",
        ))
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    let err = gateway.get_food(&FoodItemId::from("999")).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_injected_failure_is_server_error() {
    let server = MockServer::start().await;
    server.backend.fail_path("/api/food/all");
    let gateway = gateway(&server, Arc::new(MemoryTokenStore::new()));

    let err = gateway.list_food().await.unwrap_err();

    match err {
        GatewayError::Api { status, message } => {
            assert_eq!(status.as_u16(), 500);
            assert!(message.contains("injected failure"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cart_uses_query_parameters() {
    let server = MockServer::start().await;
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let food_id = server.backend.seed_food("Chai", "", 1.5, "Drinks");
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::with_token(format!(
        "unknown-{user_id}"
    )));
    let gateway = gateway(&server, tokens);
    let user = UserId::from(user_id.to_string());
    let food = FoodItemId::from(food_id.to_string());

    let err = gateway.add_to_cart(&user, &food).await.unwrap_err();
    assert!(err.is_unauthorized());

    let session = gateway
        .login(&Credentials::new(Email::parse("a@b.com").unwrap(), "pw"))
        .await
        .unwrap();
    gateway
        .token_store()
        .save(&SecretString::from(session.token))
        .await
        .unwrap();
    gateway.add_to_cart(&user, &food).await.unwrap();
    gateway.add_to_cart(&user, &food).await.unwrap();

    assert_eq!(server.backend.cart_lines(user_id), vec![(food_id, 2)]);
    let last = server.backend.requests().pop().unwrap();
    assert_eq!(
        last.path,
        format!("/api/cart/add?userId={user_id}&foodItemId={food_id}")
    );
}

#[tokio::test]
async fn test_order_lifecycle_over_http() {
    let server = MockServer::start().await;
    let admin_id = server.backend.seed_user("Root", "root@b.com", "pw", true);
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let food_id = server.backend.seed_food("Thali", "", 12.25, "Mains");
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let gateway = gateway(&server, Arc::clone(&tokens));
    let user = UserId::from(user_id.to_string());

    let session = gateway
        .login(&Credentials::new(Email::parse("a@b.com").unwrap(), "pw"))
        .await
        .unwrap();
    tokens.save(&SecretString::from(session.token)).await.unwrap();
    gateway
        .add_to_cart(&user, &FoodItemId::from(food_id.to_string()))
        .await
        .unwrap();

    let order = gateway.place_order(&user).await.unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total.to_string(), "$12.25");
    assert!(order.created_at.is_some());
    assert!(server.backend.cart_lines(user_id).is_empty());

    gateway
        .charge(&order.id, &PaymentDetails::cash())
        .await
        .unwrap();
    let payment = gateway.payment_status(&order.id).await.unwrap();
    assert_eq!(payment.amount, order.total);

    // Customers cannot change status.
    let err = gateway
        .update_order_status(&order.id, OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));

    let admin = gateway
        .login(&Credentials::new(Email::parse("root@b.com").unwrap(), "pw"))
        .await
        .unwrap();
    assert_eq!(admin.user.id, UserId::from(admin_id.to_string()));
    assert!(admin.user.is_admin());
    tokens.save(&SecretString::from(admin.token)).await.unwrap();

    gateway
        .update_order_status(&order.id, OrderStatus::Processing)
        .await
        .unwrap();
    let all = gateway.all_orders().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, OrderStatus::Processing);
    assert_eq!(
        server.backend.order_statuses(),
        vec![(order.id.as_str().parse::<i64>().unwrap(), "PROCESSING".to_owned())]
    );
}

#[tokio::test]
async fn test_review_ids_are_sent_as_strings() {
    let server = MockServer::start().await;
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let food_id = server.backend.seed_food("Dosa", "", 7.0, "Mains");
    let tokens: Arc<dyn TokenStore> = Arc::new(MemoryTokenStore::new());
    let gateway = gateway(&server, Arc::clone(&tokens));
    let session = gateway
        .login(&Credentials::new(Email::parse("a@b.com").unwrap(), "pw"))
        .await
        .unwrap();
    tokens.save(&SecretString::from(session.token)).await.unwrap();

    gateway
        .add_review(&tiffin_core::NewReview {
            user_id: UserId::from(user_id.to_string()),
            food_item_id: FoodItemId::from(food_id.to_string()),
            content: "Crispy".to_owned(),
            rating: tiffin_core::Rating::new(5).unwrap(),
        })
        .await
        .unwrap();

    let reviews = gateway
        .reviews_for(&FoodItemId::from(food_id.to_string()))
        .await
        .unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].user_name, "Asha");
    assert_eq!(reviews[0].rating.value(), 5);
}

#[tokio::test]
async fn test_user_reads_updates_and_deletes_own_account() {
    let server = MockServer::start().await;
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let other_id = server.backend.seed_user("Ravi", "r@b.com", "pw", false);
    let gateway = signed_in(&server, "a@b.com").await;
    let me = UserId::from(user_id.to_string());

    let user = gateway.get_user(&me).await.unwrap();
    assert_eq!(user.name, "Asha");
    assert_eq!(user.email.unwrap().as_str(), "a@b.com");

    let err = gateway
        .get_user(&UserId::from(other_id.to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));

    let updated = gateway
        .update_user(
            &me,
            &UserPatch {
                name: Some("Asha K".to_owned()),
                email: Some(Email::parse("asha.k@b.com").unwrap()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Asha K");
    assert_eq!(updated.email.unwrap().as_str(), "asha.k@b.com");
    let last = server.backend.requests().pop().unwrap();
    assert_eq!(last.method, "PUT");
    assert_eq!(last.path, format!("/api/users/update/{user_id}"));

    gateway.delete_account(&me).await.unwrap();
    let err = gateway.get_user(&me).await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_addresses_are_scoped_to_their_owner() {
    let server = MockServer::start().await;
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let other_id = server.backend.seed_user("Ravi", "r@b.com", "pw", false);
    let gateway = signed_in(&server, "a@b.com").await;
    let me = UserId::from(user_id.to_string());

    assert!(gateway.addresses(&me).await.unwrap().is_empty());

    let saved = gateway
        .add_address(&NewAddress::for_user(
            me.clone(),
            AddressDetails {
                street: "12 MG Road".to_owned(),
                city: "Pune".to_owned(),
                state: "MH".to_owned(),
                zip_code: "411001".to_owned(),
                country: "India".to_owned(),
                is_default: true,
            },
        ))
        .await
        .unwrap();
    assert_eq!(saved.user_id, me);
    assert!(saved.is_default);

    let listed = gateway.addresses(&me).await.unwrap();
    assert_eq!(listed, vec![saved]);

    let err = gateway
        .addresses(&UserId::from(other_id.to_string()))
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));
}

#[tokio::test]
async fn test_send_notification_needs_a_session() {
    let server = MockServer::start().await;
    let user_id = server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let me = UserId::from(user_id.to_string());

    let anonymous = gateway(&server, Arc::new(MemoryTokenStore::new()));
    let err = anonymous
        .send_notification(&me, "Your order is on its way")
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());

    let gateway = signed_in(&server, "a@b.com").await;
    gateway
        .send_notification(&me, "Your order is on its way")
        .await
        .unwrap();

    assert_eq!(
        server.backend.notifications(),
        vec![(user_id, "Your order is on its way".to_owned())]
    );
}

#[tokio::test]
async fn test_admin_manages_categories() {
    let server = MockServer::start().await;
    server.backend.seed_user("Root", "root@b.com", "pw", true);
    server.backend.seed_user("Asha", "a@b.com", "pw", false);
    let starters = server.backend.seed_category("Starters");

    let customer = signed_in(&server, "a@b.com").await;
    let err = customer
        .add_category(&NewCategory {
            name: "Desserts".to_owned(),
            description: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(403));

    let admin = signed_in(&server, "root@b.com").await;
    let desserts = admin
        .add_category(&NewCategory {
            name: "Desserts".to_owned(),
            description: Some("Sweet things".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(desserts.name, "Desserts");

    let renamed = admin
        .update_category(
            &desserts.id,
            &CategoryPatch {
                name: Some("Mithai".to_owned()),
                description: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Mithai");
    assert_eq!(renamed.description.as_deref(), Some("Sweet things"));

    admin
        .delete_category(&CategoryId::from(starters.to_string()))
        .await
        .unwrap();
    let names: Vec<_> = admin
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Mithai"]);
}
