//! Fixtures for getting users logged in through the public endpoints.

use serde_json::json;

use super::TestHarness;

/// Request and verify an OTP for `email`, returning the session token.
pub async fn login(harness: &TestHarness, email: &str, role: &str) -> String {
    let client = harness.client();

    let response = client.post("/request-otp", json!({ "email": email })).await;
    assert_eq!(response.status, 200, "request-otp failed: {}", response.body);

    let code = harness
        .last_code_for(email)
        .expect("OTP email should have been sent");

    let response = client
        .post(
            "/verify-otp",
            json!({ "email": email, "otp": code, "role": role }),
        )
        .await;
    assert_eq!(response.status, 200, "verify-otp failed: {}", response.body);

    response.body["token"]
        .as_str()
        .expect("token in response")
        .to_string()
}

pub async fn login_sharer(harness: &TestHarness, email: &str) -> String {
    login(harness, email, "sharer").await
}

pub async fn login_viewer(harness: &TestHarness, email: &str) -> String {
    login(harness, email, "viewer").await
}
