use std::sync::Arc;

use crate::{
    config::AuthConfig,
    error::AppError,
    services::user_service::UserService,
};

use super::{
    password::{verify_against_dummy, verify_password},
    session::{SessionCredential, SessionKeys, make_credential},
};

const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug)]
pub struct IssuedSession {
    pub token: String,
    pub credential: SessionCredential,
    pub expires_in: usize,
}

/// Turns username/password pairs into signed sessions and back.
#[derive(Clone)]
pub struct Authenticator {
    users: UserService,
    keys: Arc<SessionKeys>,
    ttl_secs: usize,
}

impl Authenticator {
    pub fn new(users: UserService, cfg: &AuthConfig) -> Self {
        Self {
            users,
            keys: Arc::new(SessionKeys::new(
                cfg.jwt_secret.as_bytes(),
                &cfg.previous_jwt_secrets,
            )),
            ttl_secs: cfg.session_ttl().as_secs() as usize,
        }
    }

    pub async fn issue_session(
        &self,
        username: &str,
        password: &str,
    ) -> Result<IssuedSession, AppError> {
        let Some(user) = self.users.login_candidate(username).await? else {
            verify_against_dummy(password);
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        };

        let password_ok = verify_password(password, &user.password_hash)?;
        if !password_ok || !user.active {
            tracing::info!(username = %user.username, "login rejected");
            return Err(AppError::unauthorized(INVALID_CREDENTIALS));
        }

        let credential = make_credential(user.id, &user.username, user.role_id, self.ttl_secs);
        let token = self.keys.sign(&credential)?;

        tracing::info!(username = %user.username, "session issued");

        Ok(IssuedSession {
            token,
            credential,
            expires_in: self.ttl_secs,
        })
    }

    pub fn resolve_session(&self, raw_token: &str) -> Option<SessionCredential> {
        self.keys.verify(raw_token.trim())
    }

    pub fn ttl_secs(&self) -> usize {
        self.ttl_secs
    }
}
