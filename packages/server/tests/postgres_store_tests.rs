//! The store guarantees, checked against a real Postgres.
//!
//! Requires Docker; the container is shared by every test in this file, so
//! each test works on its own freshly generated email addresses.

mod common;

use chrono::{Duration, Utc};
use common::{login, login_sharer, TestHarness};
use locshare_core::common::ApiError;
use locshare_core::domains::auth::actions::verify_otp;
use locshare_core::domains::auth::OtpCode;
use locshare_core::kernel::BaseLocationStore;
use serde_json::json;
use uuid::Uuid;

fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4().simple())
}

async fn request_code(harness: &TestHarness, email: &str) -> String {
    let response = harness
        .client()
        .post("/request-otp", json!({ "email": email }))
        .await;
    assert_eq!(response.status, 200, "request-otp failed: {}", response.body);
    harness.last_code_for(email).unwrap()
}

// ============================================================================
// OTP consumption
// ============================================================================

#[tokio::test]
async fn test_code_is_single_use() {
    let harness = TestHarness::postgres().await;
    let email = unique_email("single");
    let code = request_code(&harness, &email).await;
    let client = harness.client();

    let first = client
        .post("/verify-otp", json!({ "email": email, "otp": code }))
        .await;
    assert_eq!(first.status, 200);

    let second = client
        .post("/verify-otp", json!({ "email": email, "otp": code }))
        .await;
    assert_eq!(second.status, 400);
    assert_eq!(second.error(), "no_otp_requested");

    let consumed: bool =
        sqlx::query_scalar("SELECT consumed FROM otp_codes WHERE email = $1")
            .bind(&email)
            .fetch_one(harness.pool())
            .await
            .unwrap();
    assert!(consumed);
}

#[tokio::test]
async fn test_consume_flips_once() {
    let harness = TestHarness::postgres().await;
    let email = unique_email("consume");
    let otp = OtpCode::create(
        &email,
        "123456",
        Utc::now() + Duration::minutes(10),
        harness.pool(),
    )
    .await
    .unwrap();

    assert!(OtpCode::consume(otp.id, harness.pool()).await.unwrap());
    assert!(!OtpCode::consume(otp.id, harness.pool()).await.unwrap());
    assert!(OtpCode::find_latest_unconsumed(&email, harness.pool())
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_concurrent_verify_has_one_winner() {
    let harness = TestHarness::postgres().await;
    let email = unique_email("race");
    let code = request_code(&harness, &email).await;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let deps = harness.server_deps();
            let email = email.clone();
            let code = code.clone();
            tokio::spawn(async move { verify_otp(&email, &code, Some("sharer"), &deps).await })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(ApiError::NoOtpRequested) => {}
            Err(e) => panic!("unexpected verification error: {:?}", e),
        }
    }
    assert_eq!(winners, 1);

    let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(harness.pool())
        .await
        .unwrap();
    assert_eq!(users, 1);
}

// ============================================================================
// Users
// ============================================================================

#[tokio::test]
async fn test_first_role_wins() {
    let harness = TestHarness::postgres().await;
    let email = unique_email("role");

    login(&harness, &email, "viewer").await;

    let code = request_code(&harness, &email).await;
    let response = harness
        .client()
        .post(
            "/verify-otp",
            json!({ "email": email, "otp": code, "role": "sharer" }),
        )
        .await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["user"]["role"], "viewer");

    let role: String = sqlx::query_scalar("SELECT role FROM users WHERE email = $1")
        .bind(&email)
        .fetch_one(harness.pool())
        .await
        .unwrap();
    assert_eq!(role, "viewer");
}

// ============================================================================
// Grants
// ============================================================================

#[tokio::test]
async fn test_double_grant_leaves_one_row() {
    let harness = TestHarness::postgres().await;
    let sharer_email = unique_email("sharer");
    let viewer_email = unique_email("viewer");
    let sharer = login_sharer(&harness, &sharer_email).await;
    let client = harness.client_with_token(&sharer);

    for _ in 0..2 {
        let response = client
            .post("/permissions/grant", json!({ "viewerEmail": viewer_email }))
            .await;
        assert_eq!(response.status, 200);
    }

    let rows: Vec<bool> = sqlx::query_scalar(
        "SELECT granted FROM permission_grants WHERE sharer_email = $1 AND viewer_email = $2",
    )
    .bind(&sharer_email)
    .bind(&viewer_email)
    .fetch_all(harness.pool())
    .await
    .unwrap();
    assert_eq!(rows, vec![true]);

    let response = client.get("/permissions").await;
    assert_eq!(response.body["viewers"], json!([viewer_email]));
}

// ============================================================================
// Locations
// ============================================================================

#[tokio::test]
async fn test_latest_location_tie_breaks_on_insertion() {
    let harness = TestHarness::postgres().await;
    let email = unique_email("loc");
    let at = Utc::now();

    for (lat, lng, recorded_at) in [
        (1.0, 1.0, at),
        (2.0, 2.0, at),
        (9.0, 9.0, at - Duration::minutes(5)),
    ] {
        sqlx::query(
            "INSERT INTO locations (email, latitude, longitude, recorded_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&email)
        .bind(lat)
        .bind(lng)
        .bind(recorded_at)
        .execute(harness.pool())
        .await
        .unwrap();
    }

    let latest = harness
        .server_deps()
        .locations
        .latest(&email)
        .await
        .unwrap()
        .unwrap();
    assert_eq!((latest.latitude, latest.longitude), (2.0, 2.0));
}

#[tokio::test]
async fn test_share_location_end_to_end() {
    let harness = TestHarness::postgres().await;
    let sharer_email = unique_email("s");
    let viewer_email = unique_email("v");
    let sharer = harness.client_with_token(&login_sharer(&harness, &sharer_email).await);
    let viewer = harness.client_with_token(&login(&harness, &viewer_email, "viewer").await);
    let path = format!("/locations/{}", sharer_email);

    sharer
        .post("/locations", json!({ "lat": 10.0, "lng": 20.0 }))
        .await;
    assert_eq!(viewer.get(&path).await.error(), "no_permission");

    sharer
        .post("/permissions/grant", json!({ "viewerEmail": viewer_email }))
        .await;
    sharer
        .post("/locations", json!({ "lat": 11.0, "lng": 21.0 }))
        .await;

    let response = viewer.get(&path).await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["email"], sharer_email.as_str());
    assert_eq!(response.body["lat"], 11.0);
    assert_eq!(response.body["lng"], 21.0);
}

#[tokio::test]
async fn test_health_reports_postgres() {
    let harness = TestHarness::postgres().await;

    let response = harness.client().get("/health").await;
    assert_eq!(response.status, 200);
    assert_eq!(response.body["store"]["backend"], "postgres");
    assert_eq!(response.body["store"]["status"], "ok");
}
