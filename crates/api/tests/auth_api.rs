//! HTTP-level integration tests for login and token handling.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_user, get_auth, post_json, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;
use tradenet_api::auth::jwt::validate_token;
use tradenet_db::repositories::UserRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn login_returns_token_and_user(pool: PgPool) {
    let user = create_user(&pool, "staff@test.com", true).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "staff@test.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["expires_in"], 3600);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["email"], "staff@test.com");
    assert_eq!(json["user"]["is_staff"], true);
    assert!(json["user"].get("password_hash").is_none());

    let token = json["access_token"].as_str().unwrap();
    let claims = validate_token(token, &common::test_config().jwt).unwrap();
    assert_eq!(claims.sub, user.id);
    assert!(claims.staff);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn issued_token_grants_access(pool: PgPool) {
    create_user(&pool, "employee@test.com", false).await;

    let app = common::build_test_app(pool.clone());
    let body = json!({ "email": "employee@test.com", "password": TEST_PASSWORD });
    let json = body_json(post_json(app, "/api/v1/auth/login", body).await).await;
    let token = json["access_token"].as_str().unwrap().to_string();

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/network_links", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn wrong_password_is_unauthorized(pool: PgPool) {
    create_user(&pool, "employee@test.com", false).await;
    let app = common::build_test_app(pool);

    let body = json!({ "email": "employee@test.com", "password": "incorrect_password" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_email_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let body = json!({ "email": "ghost@test.com", "password": "whatever" });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn inactive_account_is_forbidden(pool: PgPool) {
    let user = create_user(&pool, "leaver@test.com", false).await;
    UserRepo::deactivate(&pool, user.id)
        .await
        .expect("deactivation should succeed");
    let app = common::build_test_app(pool);

    let body = json!({ "email": "leaver@test.com", "password": TEST_PASSWORD });
    let response = post_json(app, "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
