use std::{
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::{Layer, Service};
use tower_cookies::cookie::Cookie;

use super::Capability;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "access_token";

/// Session token from the `access_token` cookie, falling back to an
/// `Authorization: Bearer` header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| Cookie::split_parse(value))
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    from_cookie.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(|token| token.trim().to_string())
    })
}

/// Gates a whole route group on one capability. The resolved `Actor` is
/// stored in request extensions for the handlers behind it.
#[derive(Clone)]
pub struct RequireCapabilityLayer {
    state: Arc<AppState>,
    required: Capability,
}

impl RequireCapabilityLayer {
    pub fn new(state: Arc<AppState>, required: Capability) -> Self {
        Self { state, required }
    }
}

#[derive(Clone)]
pub struct RequireCapability<S> {
    inner: S,
    state: Arc<AppState>,
    required: Capability,
}

impl<S> Layer<S> for RequireCapabilityLayer {
    type Service = RequireCapability<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireCapability {
            inner,
            state: Arc::clone(&self.state),
            required: self.required,
        }
    }
}

impl<S> Service<Request<Body>> for RequireCapability<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let required = self.required;
        let state = Arc::clone(&self.state);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let session = session_token(req.headers())
                .and_then(|token| state.authenticator.resolve_session(&token));

            match state.guard.require(session.as_ref(), required).await {
                Ok(actor) => {
                    req.extensions_mut().insert(actor);
                    inner.call(req).await
                }
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}
