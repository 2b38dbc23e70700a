mod common;

use axum::http::{StatusCode, header};
use serde_json::json;

use hermes_hr::{auth::Capability, test_helpers::test_state};

use common::{login_admin, login_as, send, send_with_accept};

#[tokio::test]
async fn login_sets_http_only_session_cookie() {
    let (state, _rx) = test_state().await;
    login_admin(&state).await;

    let reply = send(
        &state,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "adminpassword" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.data()["access_token"].as_str().is_some());

    let cookie = reply
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("access_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Lax"));
}

#[tokio::test]
async fn wrong_password_and_unknown_user_share_one_message() {
    let (state, _rx) = test_state().await;
    login_admin(&state).await;

    let wrong = send(
        &state,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "admin", "password": "not-the-password" })),
    )
    .await;
    let unknown = send(
        &state,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "not-the-password" })),
    )
    .await;

    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json["message"], unknown.json["message"]);
}

#[tokio::test]
async fn me_reports_role_capabilities() {
    let (state, _rx) = test_state().await;
    let cookie = login_as(&state, "hr", &[Capability::Onboard]).await;

    let reply = send(&state, "GET", "/auth/me", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.data()["username"], "hr");
    assert_eq!(reply.data()["capabilities"], json!(["can_onboard"]));
}

#[tokio::test]
async fn anonymous_requests_are_unauthenticated() {
    let (state, _rx) = test_state().await;

    let reply = send(&state, "GET", "/employees", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let garbage = send(
        &state,
        "GET",
        "/auth/me",
        Some("access_token=not-a-token"),
        None,
    )
    .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn browsers_are_sent_to_login() {
    let (state, _rx) = test_state().await;

    let reply =
        send_with_accept(&state, "GET", "/employees", None, None, "text/html").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location(), Some("/login"));
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let (state, _rx) = test_state().await;
    let cookie = login_admin(&state).await;

    let reply = send(&state, "POST", "/auth/logout", Some(&cookie), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    let cleared = reply
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .unwrap();
    assert!(cleared.starts_with("access_token="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn deactivated_user_loses_access() {
    let (state, _rx) = test_state().await;
    let admin = login_admin(&state).await;
    let hr = login_as(&state, "leaver", &[Capability::Onboard]).await;

    let me = send(&state, "GET", "/auth/me", Some(&hr), None).await;
    let user_id = me.data()["user_id"].as_str().unwrap().to_string();

    let reply = send(
        &state,
        "POST",
        &format!("/admin/users/{user_id}/deactivate"),
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);

    let after = send(&state, "GET", "/auth/me", Some(&hr), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);
}
