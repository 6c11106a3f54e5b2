//! HTTP-level integration tests for the staff-only debt actions.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, expect_validation, get_auth, post_json_auth, put_json_auth, seed_link,
    staff_token, user_token,
};
use rust_decimal::Decimal;
use serde_json::json;
use sqlx::PgPool;
use tradenet_db::repositories::NetworkLinkRepo;

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_sets_debt_and_it_is_visible(pool: PgPool) {
    let token = staff_token(&pool).await;
    let supplier = seed_link(&pool, "Supplier", "Test Country", None).await;
    let id = seed_link(&pool, "Shop", "Test Country", Some(supplier)).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/network_links/{id}/debt"),
        json!({ "debt_to_supplier": "12.50" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["debt_to_supplier"], "12.50");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/network_links/{id}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["debt_to_supplier"], "12.50");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn setting_zero_debt_renders_two_fraction_digits(pool: PgPool) {
    let token = staff_token(&pool).await;
    let id = seed_link(&pool, "Shop", "Test Country", None).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/network_links/{id}/debt"),
        json!({ "debt_to_supplier": 0 }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["debt_to_supplier"], "0.00");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn negative_debt_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;
    let id = seed_link(&pool, "Shop", "Test Country", None).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/network_links/{id}/debt"),
        json!({ "debt_to_supplier": "-100.00" }),
        &token,
    )
    .await;

    let errors = expect_validation(response).await;
    assert_eq!(
        errors["debt_to_supplier"][0],
        "Debt to supplier cannot be negative."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn missing_debt_value_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;
    let id = seed_link(&pool, "Shop", "Test Country", None).await;
    let app = common::build_test_app(pool);

    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/network_links/{id}/debt"),
        json!({}),
        &token,
    )
    .await;

    let errors = expect_validation(response).await;
    assert_eq!(errors["debt_to_supplier"][0], "This field is required.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clear_debt_zeroes_listed_links(pool: PgPool) {
    let token = staff_token(&pool).await;
    let a = seed_link(&pool, "A", "Test Country", None).await;
    let b = seed_link(&pool, "B", "Test Country", None).await;
    let untouched = seed_link(&pool, "C", "Test Country", None).await;
    for id in [a, b, untouched] {
        NetworkLinkRepo::set_debt(&pool, id, Decimal::new(5000, 2))
            .await
            .unwrap();
    }

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/network_links/clear-debt",
        json!({ "ids": [a, b, 999] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["updated"], 2);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/network_links/{a}"), &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["debt_to_supplier"], "0.00");
    let link = NetworkLinkRepo::find_by_id(&pool, untouched)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(link.debt_to_supplier, Decimal::new(5000, 2));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn clear_debt_requires_ids(pool: PgPool) {
    let token = staff_token(&pool).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/admin/network_links/clear-debt",
        json!({ "ids": [] }),
        &token,
    )
    .await;

    let errors = expect_validation(response).await;
    assert_eq!(errors["ids"][0], "This field cannot be empty.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_staff_is_forbidden(pool: PgPool) {
    let token = user_token(&pool).await;
    let id = seed_link(&pool, "Shop", "Test Country", None).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/admin/network_links/clear-debt",
        json!({ "ids": [id] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/admin/network_links/{id}/debt"),
        json!({ "debt_to_supplier": "1.00" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
