#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{HeaderMap, Request, StatusCode, header},
    middleware,
};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use hermes_hr::{
    auth::{Capability, CapabilitySet, bootstrap::seed_admin, password},
    db::dao::{DaoContext, user_dao::NewUser},
    middleware::{catch_panic_layer, json_error_middleware, redirect_middleware},
    routes::{API_PREFIX, router},
    services::ServiceContext,
    state::AppState,
};

pub const PASSWORD: &str = "password123";

pub fn api_path(path: &str) -> String {
    format!("{API_PREFIX}{path}")
}

/// The router wrapped in the same layers the binary installs.
pub fn app(state: &Arc<AppState>) -> Router {
    Router::new()
        .merge(router(Arc::clone(state)))
        .layer(middleware::from_fn(json_error_middleware))
        .layer(middleware::from_fn(redirect_middleware))
        .layer(catch_panic_layer())
}

pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: Value,
}

impl Reply {
    pub fn data(&self) -> &Value {
        &self.json["data"]
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok())
    }
}

pub async fn send(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Reply {
    send_with_accept(state, method, path, cookie, body, "application/json").await
}

pub async fn send_with_accept(
    state: &Arc<AppState>,
    method: &str,
    path: &str,
    cookie: Option<&str>,
    body: Option<Value>,
    accept: &str,
) -> Reply {
    let mut builder = Request::builder()
        .method(method)
        .uri(api_path(path))
        .header(header::ACCEPT, accept);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app(state).oneshot(request).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let bytes = body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply {
        status,
        headers,
        json,
    }
}

/// Logs in and returns the `Cookie` header value carrying the session.
pub async fn login(state: &Arc<AppState>, username: &str, password: &str) -> String {
    let reply = send(
        state,
        "POST",
        "/auth/login",
        None,
        Some(serde_json::json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK, "login failed: {}", reply.json);

    let set_cookie = reply
        .headers
        .get(header::SET_COOKIE)
        .and_then(|value| value.to_str().ok())
        .expect("login should set a cookie");
    set_cookie
        .split(';')
        .next()
        .expect("cookie should have a name=value pair")
        .to_string()
}

pub async fn login_admin(state: &Arc<AppState>) -> String {
    seed_admin(&state.config.auth, &ServiceContext::new(&state.db))
        .await
        .unwrap();
    login(
        state,
        &state.config.auth.admin_username,
        &state.config.auth.admin_password,
    )
    .await
}

/// Creates a role holding exactly `caps` and a user in it, then logs in.
pub async fn login_as(state: &Arc<AppState>, username: &str, caps: &[Capability]) -> String {
    let daos = DaoContext::new(&state.db);
    let role = daos
        .role()
        .create_role(
            &format!("{username}-role"),
            None,
            caps.iter().copied().collect::<CapabilitySet>(),
        )
        .await
        .unwrap();
    let hash = password::hash_password(PASSWORD).unwrap();
    daos.user()
        .create_user(NewUser {
            username,
            first_name: "Test",
            last_name: "User",
            password_hash: &hash,
            role_id: role.id,
            team_id: None,
        })
        .await
        .unwrap();
    login(state, username, PASSWORD).await
}
