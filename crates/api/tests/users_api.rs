//! Integration tests for `/api/v1/users`, including the CSV bulk import.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get_auth, post_file_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;
use visitgate_core::roles::Role;
use visitgate_db::repositories::{UserRepo, VisitorRepo};

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_admins_cannot_manage_users(pool: PgPool) {
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    let resident = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;

    for user in [&guard, &resident] {
        let response = get_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/users",
            &common::token_for(user),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_creates_and_lists_users(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let token = common::token_for(&admin);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        json!({
            "residence_number": "G-1",
            "email": "Guard@Condo.mx",
            "phone": "555-0101",
            "password": "guardpass",
            "role": "guard",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["role"], "guard");
    assert_eq!(created["data"]["email"], "guard@condo.mx");

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users",
        json!({
            "residence_number": "A-101",
            "email": "ana@condo.mx",
            "phone": "555-0102",
            "password": "resident1",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["role"], "resident");

    let response = get_auth(common::build_test_app(pool), "/api/v1/users", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_uniqueness_and_rehashes_password(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    common::create_user(&pool, "A-102", "luis@condo.mx", Role::Resident).await;
    let token = common::token_for(&admin);
    let uri = format!("/api/v1/users/{}", ana.id);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "residence_number": "A-102" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Re-submitting the account's own values is not a conflict.
    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({
            "email": "ana@condo.mx",
            "phone": "555-9999",
            "role": "guard",
            "password": "new-secret",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["phone"], "555-9999");
    assert_eq!(json["data"]["role"], "guard");
    assert_eq!(json["data"]["residence_number"], "A-101");

    let stored = UserRepo::find_by_id(&pool, ana.id).await.unwrap().unwrap();
    assert_ne!(stored.password_hash, ana.password_hash);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_rejects_blanking_a_field(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", ana.id),
        json!({ "phone": "   " }),
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_unknown_user_returns_404(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/users/999999",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_a_resident_keeps_their_visits(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let visit = common::create_visit(&pool, ana.id, "VISDEL0001", common::test_today()).await;
    let token = common::token_for(&admin);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{}", ana.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let orphan = VisitorRepo::find_by_id(&pool, visit.id).await.unwrap().unwrap();
    assert_eq!(orphan.resident_id, None);

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", ana.id),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_cannot_delete_own_account(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let response = delete_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{}", admin.id),
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// CSV import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_reports_successes_duplicates_and_skips(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;

    let csv = "residenceNumber,email,phone,password,role\n\
               B-201,luis@condo.mx,555-0201,luispass,\n\
               A-101,someone@condo.mx,555-0202,,\n\
               B-203,not-an-email,555-0203,,\n\
               G-2,Gate@Condo.mx,555-0204,,Guard\n";

    let response = post_file_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/import",
        "residents.csv",
        csv,
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let summary = &json["data"];
    assert_eq!(summary["total"], 4);
    assert_eq!(summary["success"], 2);
    assert_eq!(summary["duplicates"], 1);
    assert_eq!(summary["skipped"], 1);

    let errors: Vec<&str> = summary["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e.as_str().unwrap())
        .collect();
    assert!(errors.iter().any(|e| e.starts_with("Row 3:")));
    assert!(errors.iter().any(|e| e.starts_with("Row 4:") && e.contains("invalid email")));

    let guard = UserRepo::find_by_email(&pool, "gate@condo.mx")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(guard.role, Role::Guard);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_skips_rows_with_nul_bytes_and_keeps_going(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let csv = "residenceNumber,email,phone\n\
               B-1,b1@condo.mx,555-0001\n\
               B-2\0,b2@condo.mx,555-0002\n\
               B-3,b3@condo.mx,555-0003\n";

    let response = post_file_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/users/import",
        "residents.csv",
        csv,
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let summary = &json["data"];
    assert_eq!(summary["success"], 2);
    assert_eq!(summary["skipped"], 1);
    assert!(summary["errors"][0]
        .as_str()
        .unwrap()
        .contains("NUL byte"));

    assert!(UserRepo::find_by_email(&pool, "b3@condo.mx")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_rejects_non_csv_uploads(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let response = post_file_auth(
        common::build_test_app(pool),
        "/api/v1/users/import",
        "residents.xlsx",
        "binary",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_rejects_file_without_rows(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let response = post_file_auth(
        common::build_test_app(pool),
        "/api/v1/users/import",
        "empty.csv",
        "residenceNumber,email,phone\n",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
