#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use chrono::{NaiveDate, TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use visitgate_api::auth::jwt::{generate_access_token, JwtConfig};
use visitgate_api::auth::password::hash_password;
use visitgate_api::config::ServerConfig;
use visitgate_api::router::build_app_router;
use visitgate_api::state::AppState;
use visitgate_core::calendar::Calendar;
use visitgate_core::clock::FixedClock;
use visitgate_core::roles::Role;
use visitgate_core::types::{DbId, Timestamp};
use visitgate_db::models::user::{CreateUser, User};
use visitgate_db::models::visitor::{CreateVisitor, Visitor};
use visitgate_db::repositories::{UserRepo, VisitorRepo};

/// Password given to every account created with [`create_user`].
pub const TEST_PASSWORD: &str = "password123";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default),
/// a 30-second request timeout, and a UTC calendar.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        calendar: Calendar::utc(),
        log_json: false,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// The instant every test app is frozen at: 2026-03-15 12:00 UTC.
pub fn test_now() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

/// The local date of [`test_now`].
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
}

/// Build the full application router, frozen at [`test_now`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_at(pool, test_now())
}

/// Build the full application router with the clock frozen at `now`.
///
/// Goes through the same `build_app_router` as `main.rs`, so tests exercise
/// the production middleware stack.
pub fn build_test_app_at(pool: PgPool, now: Timestamp) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(test_config()),
        clock: Arc::new(FixedClock(now)),
    };
    build_app_router(state)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert an account directly, bypassing the first-admin rule.
pub async fn create_user(pool: &PgPool, residence: &str, email: &str, role: Role) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            residence_number: residence.to_string(),
            email: email.to_string(),
            phone: "555-0100".to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
        },
    )
    .await
    .unwrap()
}

/// A bearer token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.role, &test_config().jwt).unwrap()
}

/// Insert a visit with a known code.
pub async fn create_visit(
    pool: &PgPool,
    resident_id: DbId,
    code: &str,
    date: NaiveDate,
) -> Visitor {
    VisitorRepo::create(
        pool,
        &CreateVisitor {
            visit_code: code.to_string(),
            visitor_name: format!("Guest {code}"),
            visitor_phone: "555-0199".to_string(),
            visit_date: date,
            visit_time: "18:00".to_string(),
            visit_reason: "Dinner".to_string(),
            resident_id,
        },
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// POST a single-file multipart upload under the `file` field.
pub async fn post_file_auth(
    app: Router,
    uri: &str,
    filename: &str,
    contents: &str,
    token: &str,
) -> Response<Body> {
    const BOUNDARY: &str = "visitgate-test-boundary";
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {contents}\r\n\
         --{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}
