use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Signed, self-contained proof of login. Never stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential {
    #[serde(rename = "sub")]
    pub user_id: Uuid,
    pub username: String,
    pub role_id: Uuid,
    pub iat: usize,
    pub exp: usize,
}

/// Current signing key plus retired keys that still verify.
#[derive(Clone)]
pub struct SessionKeys {
    enc: EncodingKey,
    dec: DecodingKey,
    previous: Vec<DecodingKey>,
}

impl SessionKeys {
    pub fn new(secret: &[u8], previous: &[String]) -> Self {
        Self {
            enc: EncodingKey::from_secret(secret),
            dec: DecodingKey::from_secret(secret),
            previous: previous
                .iter()
                .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
                .collect(),
        }
    }

    pub fn sign(&self, credential: &SessionCredential) -> Result<String, AppError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".into());

        encode(&header, credential, &self.enc)
            .map_err(|err| AppError::internal(format!("Session signing failed: {err}")))
    }

    /// Any failure (bad signature under every key, expiry, garbage input)
    /// yields `None`.
    pub fn verify(&self, token: &str) -> Option<SessionCredential> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        std::iter::once(&self.dec)
            .chain(self.previous.iter())
            .find_map(|key| decode::<SessionCredential>(token, key, &validation).ok())
            .map(|data| data.claims)
            // jsonwebtoken treats exp == now as still valid.
            .filter(|credential| credential.exp > now_unix())
    }
}

pub fn now_unix() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as usize)
        .unwrap_or_default()
}

pub fn make_credential(
    user_id: Uuid,
    username: &str,
    role_id: Uuid,
    ttl_secs: usize,
) -> SessionCredential {
    let iat = now_unix();
    SessionCredential {
        user_id,
        username: username.to_string(),
        role_id,
        iat,
        exp: iat + ttl_secs,
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{SessionKeys, make_credential, now_unix};

    const SECRET: &[u8] = b"unit-test-secret-0123";

    #[test]
    fn signed_session_round_trips() {
        let keys = SessionKeys::new(SECRET, &[]);
        let credential = make_credential(Uuid::new_v4(), "ana", Uuid::new_v4(), 600);
        let token = keys.sign(&credential).expect("token should sign");

        assert_eq!(keys.verify(&token), Some(credential));
    }

    #[test]
    fn expired_session_is_absent_even_with_valid_signature() {
        let keys = SessionKeys::new(SECRET, &[]);
        let mut credential = make_credential(Uuid::new_v4(), "ana", Uuid::new_v4(), 600);
        credential.iat = now_unix() - 7200;
        credential.exp = now_unix() - 1;
        let token = keys.sign(&credential).expect("token should sign");

        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn tampered_or_malformed_tokens_are_absent() {
        let keys = SessionKeys::new(SECRET, &[]);
        let token = keys
            .sign(&make_credential(Uuid::new_v4(), "ana", Uuid::new_v4(), 600))
            .expect("token should sign");
        let flip_at = token.len() - 10;
        let original = token.as_bytes()[flip_at];
        let mut tampered = token.clone();
        tampered.replace_range(
            flip_at..flip_at + 1,
            if original == b'A' { "B" } else { "A" },
        );

        assert_eq!(keys.verify(&tampered), None);
        assert_eq!(keys.verify("not-a-token"), None);
        assert_eq!(keys.verify(""), None);
    }

    #[test]
    fn retired_secret_still_verifies_until_removed() {
        let old = SessionKeys::new(b"old-secret-0123456789", &[]);
        let token = old
            .sign(&make_credential(Uuid::new_v4(), "ana", Uuid::new_v4(), 600))
            .expect("token should sign");

        let rotated = SessionKeys::new(SECRET, &["old-secret-0123456789".to_string()]);
        assert!(rotated.verify(&token).is_some());

        let dropped = SessionKeys::new(SECRET, &[]);
        assert!(dropped.verify(&token).is_none());
    }
}
