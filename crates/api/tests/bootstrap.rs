//! Integration tests for startup seeding of the staff account.

use assert_matches::assert_matches;
use sqlx::PgPool;
use tradenet_api::auth::password::verify_password;
use tradenet_api::bootstrap::{ensure_admin, BootstrapError};
use tradenet_api::config::BootstrapAdmin;
use tradenet_db::repositories::UserRepo;

fn admin(password: &str) -> BootstrapAdmin {
    BootstrapAdmin {
        email: "admin@test.com".to_string(),
        password: password.to_string(),
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn creates_staff_user_once(pool: PgPool) {
    assert!(ensure_admin(&pool, &admin("first-password")).await.unwrap());
    assert!(!ensure_admin(&pool, &admin("second-password")).await.unwrap());

    let user = UserRepo::find_by_email(&pool, "admin@test.com")
        .await
        .unwrap()
        .unwrap();
    assert!(user.is_staff);
    assert!(user.is_active);
    assert!(verify_password("first-password", &user.password_hash).unwrap());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn short_password_is_refused(pool: PgPool) {
    let result = ensure_admin(&pool, &admin("short")).await;
    assert_matches!(result, Err(BootstrapError::WeakPassword(_)));
}
