use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_cookies::{
    Cookie, Cookies,
    cookie::{SameSite, time::Duration},
};
use uuid::Uuid;

use crate::{
    auth::{Actor, Capability, IssuedSession, SESSION_COOKIE},
    middleware::CurrentActor,
    response::{ApiResult, JsonApiResponse},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: usize,
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub username: String,
    pub role_id: Uuid,
    pub role_name: String,
    pub capabilities: Vec<Capability>,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
        .with_state(state)
}

async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(body): Json<LoginRequest>,
) -> ApiResult<SessionResponse> {
    let issued = state
        .authenticator
        .issue_session(&body.username, &body.password)
        .await?;
    set_session_cookie(&cookies, &issued, state.config.auth.cookie_secure);
    JsonApiResponse::ok(issued.into())
}

async fn logout(cookies: Cookies) -> ApiResult<serde_json::Value> {
    cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
    JsonApiResponse::ok(serde_json::json!({ "logged_out": true }))
}

async fn me(CurrentActor(actor): CurrentActor) -> ApiResult<MeResponse> {
    JsonApiResponse::ok(actor.into())
}

fn set_session_cookie(cookies: &Cookies, issued: &IssuedSession, secure: bool) {
    let mut cookie = Cookie::new(SESSION_COOKIE, issued.token.clone());
    cookie.set_http_only(true);
    cookie.set_secure(secure);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_path("/");
    cookie.set_max_age(Duration::seconds(issued.expires_in as i64));
    cookies.add(cookie);
}

impl From<IssuedSession> for SessionResponse {
    fn from(issued: IssuedSession) -> Self {
        Self {
            access_token: issued.token,
            token_type: "Bearer",
            expires_in: issued.expires_in,
            user_id: issued.credential.user_id,
            username: issued.credential.username,
        }
    }
}

impl From<Actor> for MeResponse {
    fn from(actor: Actor) -> Self {
        Self {
            user_id: actor.user_id,
            username: actor.username,
            role_id: actor.role_id,
            role_name: actor.role_name,
            capabilities: actor.capabilities.iter().collect(),
        }
    }
}
