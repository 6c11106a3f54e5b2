//! HTTP-level integration tests for the `/products` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, expect_validation, get_auth, post_json_auth, put_json_auth, seed_link,
    seed_product, staff_token, user_token,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn staff_creates_product_with_links(pool: PgPool) {
    let token = staff_token(&pool).await;
    let link = seed_link(&pool, "Shop", "Test Country", None).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Phone",
        "model": "X1",
        "release_date": "2020-10-01",
        "network_links": [link]
    });
    let response = post_json_auth(app, "/api/v1/products", body, &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Phone");
    assert_eq!(json["data"]["release_date"], "2020-10-01");
    assert_eq!(json["data"]["network_links"], json!([link]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_staff_cannot_create_product(pool: PgPool) {
    let token = user_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({ "name": "Phone", "model": "X1", "release_date": "2020-10-01" });
    let response = post_json_auth(app, "/api/v1/products", body, &token).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn create_with_unknown_link_is_rejected(pool: PgPool) {
    let token = staff_token(&pool).await;
    let app = common::build_test_app(pool);

    let body = json!({
        "name": "Phone",
        "model": "X1",
        "release_date": "2020-10-01",
        "network_links": [777]
    });
    let response = post_json_auth(app, "/api/v1/products", body, &token).await;

    let errors = expect_validation(response).await;
    assert_eq!(
        errors["network_links"][0],
        "Invalid pk \"777\" - object does not exist."
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_network_link(pool: PgPool) {
    let token = user_token(&pool).await;
    let phone = seed_product(&pool, "Phone").await;
    seed_product(&pool, "Tablet").await;
    let link = seed_link(&pool, "Shop", "Test Country", None).await;
    tradenet_db::repositories::ProductRepo::update(
        &pool,
        phone,
        &tradenet_db::models::product::UpdateProduct {
            network_links: Some(vec![link]),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/products", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/products?network_link_id={link}"),
        &token,
    )
    .await;
    let json = body_json(response).await;
    let products = json["data"].as_array().unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["id"], phone);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn update_replaces_links_and_delete_removes(pool: PgPool) {
    let token = staff_token(&pool).await;
    let product = seed_product(&pool, "Phone").await;
    let first = seed_link(&pool, "First", "Test Country", None).await;
    let second = seed_link(&pool, "Second", "Test Country", None).await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/products/{product}"),
        json!({ "model": "X2", "network_links": [first, second] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Phone");
    assert_eq!(json["data"]["model"], "X2");
    assert_eq!(json["data"]["network_links"], json!([first, second]));

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/products/{product}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/products/{product}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
