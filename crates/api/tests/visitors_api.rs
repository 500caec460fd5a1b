//! Integration tests for `/api/v1/visitors` and `/api/v1/admin/visitors`.

mod common;

use axum::http::StatusCode;
use chrono::{Days, Duration};
use common::{
    body_json, delete_auth, get_auth, post_auth, post_json_auth, put_json_auth, test_today,
};
use serde_json::json;
use sqlx::PgPool;
use visitgate_core::roles::Role;
use visitgate_db::repositories::VisitorRepo;

fn new_visitor(date: chrono::NaiveDate) -> serde_json::Value {
    json!({
        "visitor_name": "Luis Perez",
        "visitor_phone": "555-0300",
        "visit_date": date,
        "visit_time": "18:30",
        "visit_reason": "Family dinner",
    })
}

// ---------------------------------------------------------------------------
// Registration and history
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn resident_registers_visitor_with_generated_code(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/visitors",
        new_visitor(test_today()),
        &common::token_for(&ana),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let code = json["data"]["visit_code"].as_str().unwrap();
    assert!(code.starts_with("VIS"));
    assert_eq!(code.len(), 12);
    assert_eq!(json["data"]["resident_id"], ana.id);
    assert!(json["data"]["visited_at"].is_null());
    assert_eq!(json["data"]["photos_uploaded"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn registration_rejects_blank_fields(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let mut body = new_visitor(test_today());
    body["visitor_name"] = json!("  ");

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/visitors",
        body,
        &common::token_for(&ana),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("visitor_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn history_lists_only_own_visitors_newest_first(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let luis = common::create_user(&pool, "A-102", "luis@condo.mx", Role::Resident).await;
    let first = common::create_visit(&pool, ana.id, "VISHIST001", test_today()).await;
    let second = common::create_visit(&pool, ana.id, "VISHIST002", test_today()).await;
    common::create_visit(&pool, luis.id, "VISHIST003", test_today()).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/visitors/history",
        &common::token_for(&ana),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let ids: Vec<i64> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert_eq!(json["data"][0]["residence"], "A-101");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pass_is_only_visible_to_its_host(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let luis = common::create_user(&pool, "A-102", "luis@condo.mx", Role::Resident).await;
    let visit = common::create_visit(&pool, ana.id, "VISPASS001", test_today()).await;
    let uri = format!("/api/v1/visitors/{}/pass", visit.id);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &common::token_for(&ana),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["visit_code"], "VISPASS001");
    assert!(json["data"]["message"]
        .as_str()
        .unwrap()
        .contains("VISPASS001"));
    assert!(json["data"]["whatsapp_url"]
        .as_str()
        .unwrap()
        .starts_with("https://wa.me/?text="));

    let response = get_auth(common::build_test_app(pool), &uri, &common::token_for(&luis)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Gate
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn residents_cannot_use_gate_routes(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let token = common::token_for(&ana);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/visitors/verify",
        json!({ "code": "VISXYZ123" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(common::build_test_app(pool), "/api/v1/visitors/today", &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn verify_accepts_code_only_on_its_day(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    common::create_visit(&pool, ana.id, "VISXYZ123", test_today()).await;
    let token = common::token_for(&guard);

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/visitors/verify",
        json!({ "code": " VISXYZ123 " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], true);
    assert_eq!(json["data"]["visitor"]["residence"], "A-101");
    assert!(json["data"].get("message").is_none());

    let tomorrow = common::test_now() + Duration::days(1);
    let response = post_json_auth(
        common::build_test_app_at(pool.clone(), tomorrow),
        "/api/v1/visitors/verify",
        json!({ "code": "VISXYZ123" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["valid"], false);
    assert_eq!(json["data"]["message"], "Code invalid or expired");
    assert!(json["data"].get("visitor").is_none());

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/visitors/verify",
        json!({ "code": "visxyz123" }),
        &token,
    )
    .await;
    assert_eq!(body_json(response).await["data"]["valid"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn today_lists_only_todays_visits(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let today = common::create_visit(&pool, ana.id, "VISTODAY01", test_today()).await;
    common::create_visit(
        &pool,
        ana.id,
        "VISTMRW001",
        test_today().checked_add_days(Days::new(1)).unwrap(),
    )
    .await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/visitors/today",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let visits = json["data"].as_array().unwrap();
    assert_eq!(visits.len(), 1);
    assert_eq!(visits[0]["id"], today.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mark_visited_keeps_first_timestamp(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    let visit = common::create_visit(&pool, ana.id, "VISMARK001", test_today()).await;
    let token = common::token_for(&guard);
    let uri = format!("/api/v1/visitors/{}/visit", visit.id);

    let response = post_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert!(first["data"]["visited_at"].is_string());

    let later = common::test_now() + Duration::hours(2);
    let response = post_auth(common::build_test_app_at(pool.clone(), later), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(first["data"]["visited_at"], second["data"]["visited_at"]);

    let stored = VisitorRepo::find_by_id(&pool, visit.id).await.unwrap().unwrap();
    assert_eq!(stored.visited_at, Some(common::test_now()));

    let response = post_auth(
        common::build_test_app(pool),
        "/api/v1/visitors/999999/visit",
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn details_include_host_contact(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    let visit = common::create_visit(&pool, ana.id, "VISDETL001", test_today()).await;

    let response = get_auth(
        common::build_test_app(pool),
        &format!("/api/v1/visitors/{}", visit.id),
        &common::token_for(&guard),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["visit_code"], "VISDETL001");
    assert_eq!(json["data"]["host_email"], "ana@condo.mx");
    assert_eq!(json["data"]["residence"], "A-101");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn photos_can_be_attached_once(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    let visit = common::create_visit(&pool, ana.id, "VISPHOT001", test_today()).await;
    let token = common::token_for(&guard);
    let uri = format!("/api/v1/visitors/{}/photos", visit.id);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "photos": [] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "photos": ["gate/1.jpg", "gate/2.jpg"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["photos_uploaded"], true);

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &uri,
        json!({ "photos": ["gate/3.jpg"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = get_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["photos"], json!(["gate/1.jpg", "gate/2.jpg"]));

    let response = put_json_auth(
        common::build_test_app(pool),
        "/api/v1/visitors/999999/photos",
        json!({ "photos": ["gate/1.jpg"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_listing_applies_filters(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let luis = common::create_user(&pool, "B-202", "luis@condo.mx", Role::Resident).await;
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let yesterday = test_today().checked_sub_days(Days::new(1)).unwrap();

    let visited = common::create_visit(&pool, ana.id, "VISLIST001", test_today()).await;
    VisitorRepo::mark_visited(&pool, visited.id, common::test_now())
        .await
        .unwrap();
    common::create_visit(&pool, ana.id, "VISLIST002", yesterday).await;
    let photographed = common::create_visit(&pool, luis.id, "VISLIST003", test_today()).await;
    VisitorRepo::attach_photos(&pool, photographed.id, &["p.jpg".to_string()])
        .await
        .unwrap();

    let token = common::token_for(&admin);
    let count = |json: serde_json::Value| json["data"].as_array().unwrap().len();

    let all = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/visitors",
        &token,
    )
    .await;
    assert_eq!(count(body_json(all).await), 3);

    let visited_only = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/visitors?status=visited",
        &token,
    )
    .await;
    let json = body_json(visited_only).await;
    assert_eq!(count(json.clone()), 1);
    assert_eq!(json["data"][0]["id"], visited.id);

    let by_residence = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/visitors?search=b-20",
        &token,
    )
    .await;
    assert_eq!(count(body_json(by_residence).await), 1);

    let with_photos = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/admin/visitors?photos=with",
        &token,
    )
    .await;
    assert_eq!(count(body_json(with_photos).await), 1);

    let uri = format!("/api/v1/admin/visitors?date_from={yesterday}&date_to={yesterday}&limit=10");
    let by_date = get_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(count(body_json(by_date).await), 1);

    let paged = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/visitors?limit=2&offset=2",
        &token,
    )
    .await;
    assert_eq!(count(body_json(paged).await), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_listing_rejects_inverted_date_range(pool: PgPool) {
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/admin/visitors?date_from=2026-03-20&date_to=2026-03-01",
        &common::token_for(&admin),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_deletes_visit_and_gets_photo_refs(pool: PgPool) {
    let ana = common::create_user(&pool, "A-101", "ana@condo.mx", Role::Resident).await;
    let admin = common::create_user(&pool, "ADM", "admin@condo.mx", Role::Administrator).await;
    let guard = common::create_user(&pool, "G-1", "guard@condo.mx", Role::Guard).await;
    let visit = common::create_visit(&pool, ana.id, "VISGONE001", test_today()).await;
    VisitorRepo::attach_photos(&pool, visit.id, &["gate/a.jpg".to_string()])
        .await
        .unwrap();
    let uri = format!("/api/v1/admin/visitors/{}", visit.id);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &uri,
        &common::token_for(&guard),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let token = common::token_for(&admin);
    let response = delete_auth(common::build_test_app(pool.clone()), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["photos"], json!(["gate/a.jpg"]));

    let response = delete_auth(common::build_test_app(pool), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
