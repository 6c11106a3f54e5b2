#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use tradenet_api::auth::jwt::{generate_access_token, JwtConfig};
use tradenet_api::auth::password::hash_password;
use tradenet_api::config::{LogFormat, ServerConfig};
use tradenet_api::router::build_app_router;
use tradenet_api::state::AppState;
use tradenet_core::network_type::NetworkType;
use tradenet_core::types::DbId;
use tradenet_db::models::address::Address;
use tradenet_db::models::network_link::CreateNetworkLink;
use tradenet_db::models::product::CreateProduct;
use tradenet_db::models::user::{CreateUser, User};
use tradenet_db::repositories::{NetworkLinkRepo, ProductRepo, UserRepo};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Server configuration for tests: local CORS origin, fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        log_format: LogFormat::Pretty,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
        bootstrap_admin: None,
    }
}

/// Full application router (same middleware stack as the binary).
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

// ---------------------------------------------------------------------------
// Users and tokens
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, email: &str, is_staff: bool) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            is_staff,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.is_staff, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create an active non-staff user and return its token.
pub async fn user_token(pool: &PgPool) -> String {
    let user = create_user(pool, "employee@test.com", false).await;
    token_for(&user)
}

/// Create an active staff user and return its token.
pub async fn staff_token(pool: &PgPool) -> String {
    let user = create_user(pool, "staff@test.com", true).await;
    token_for(&user)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn address(country: &str) -> Address {
    Address {
        country: country.to_string(),
        city: "Test City".to_string(),
        street: "Test Street".to_string(),
        house_number: "1A".to_string(),
    }
}

/// Insert a link directly through the repository.
pub async fn seed_link(pool: &PgPool, name: &str, country: &str, supplier: Option<DbId>) -> DbId {
    NetworkLinkRepo::create(
        pool,
        &CreateNetworkLink {
            name: name.to_string(),
            network_type: NetworkType::Retail,
            email: format!("{}@example.com", name.to_lowercase().replace(' ', "-")),
            address: address(country),
            supplier_id: supplier,
            product_ids: vec![],
        },
    )
    .await
    .expect("link creation should succeed")
    .id
}

/// Insert a product directly through the repository.
pub async fn seed_product(pool: &PgPool, name: &str) -> DbId {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: name.to_string(),
            model: "Test Model".to_string(),
            release_date: NaiveDate::from_ymd_opt(2020, 10, 1).unwrap(),
            network_links: vec![],
        },
    )
    .await
    .expect("product creation should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Assert a 400 validation response and return its `errors` map.
pub async fn expect_validation(response: Response) -> Value {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    json["errors"].clone()
}
