use std::{convert::Infallible, marker::PhantomData, sync::Arc};

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    auth::{Actor, RequiredCapability, SessionCredential, session_token},
    error::AppError,
    state::AppState,
};

/// The verified session, if any. Never rejects.
pub struct MaybeSession(pub Option<SessionCredential>);

impl FromRequestParts<Arc<AppState>> for MaybeSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(session) = parts.extensions.get::<SessionCredential>().cloned() {
            return Ok(Self(Some(session)));
        }

        let session = session_token(&parts.headers)
            .and_then(|token| state.authenticator.resolve_session(&token));
        if let Some(session) = &session {
            parts.extensions.insert(session.clone());
        }
        Ok(Self(session))
    }
}

/// Any logged-in, active user.
pub struct CurrentActor(pub Actor);

impl FromRequestParts<Arc<AppState>> for CurrentActor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Set by `RequireCapabilityLayer` when the route group is gated.
        if let Some(actor) = parts.extensions.get::<Actor>().cloned() {
            return Ok(Self(actor));
        }

        let MaybeSession(session) = MaybeSession::from_request_parts(parts, state)
            .await
            .unwrap_or_else(|never| match never {});
        let actor = state.guard.authenticate(session.as_ref()).await?;
        parts.extensions.insert(actor.clone());
        Ok(Self(actor))
    }
}

/// A logged-in user whose role holds `C`'s capability.
pub struct Authorized<C: RequiredCapability> {
    pub actor: Actor,
    _marker: PhantomData<C>,
}

impl<C> FromRequestParts<Arc<AppState>> for Authorized<C>
where
    C: RequiredCapability,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let CurrentActor(actor) = CurrentActor::from_request_parts(parts, state).await?;
        if let Err(denial) = actor.ensure(C::required()) {
            tracing::info!(
                username = %actor.username,
                capability = %C::required(),
                "capability check denied"
            );
            return Err(denial.into());
        }

        Ok(Self {
            actor,
            _marker: PhantomData,
        })
    }
}
