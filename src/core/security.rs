use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::core::config::AuthSettings;
use crate::db::types::UserRole;

// Argon2id, 19 MiB, two passes, single lane.
const ARGON2_PARAMS: (u32, u32, u32) = (19_456, 2, 1);

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("password hashing failed")]
    Hashing,
    #[error("stored password hash is unreadable")]
    MalformedHash,
    #[error("failed to sign access token")]
    TokenSigning,
    #[error("access token rejected")]
    TokenRejected,
}

/// Token payload: the user id as `sub` plus the role used for route gating.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) role: UserRole,
    pub(crate) exp: i64,
}

impl Claims {
    pub(crate) fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

fn hasher() -> Argon2<'static> {
    let (memory, passes, lanes) = ARGON2_PARAMS;
    let params = Params::new(memory, passes, lanes, None).unwrap_or_default();
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

pub(crate) fn hash_password(password: &str) -> Result<String, SecurityError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| SecurityError::Hashing)
}

/// `Ok(false)` for a wrong password; `Err` only when the stored hash cannot be used.
pub(crate) fn verify_password(password: &str, hash: &str) -> Result<bool, SecurityError> {
    let parsed = PasswordHash::new(hash).map_err(|_| SecurityError::MalformedHash)?;

    match hasher().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(_) => Err(SecurityError::MalformedHash),
    }
}

pub(crate) fn create_access_token(
    user_id: i64,
    role: UserRole,
    auth: &AuthSettings,
    ttl: Option<Duration>,
) -> Result<String, SecurityError> {
    let ttl = ttl.unwrap_or_else(|| Duration::minutes(auth.token_ttl_minutes));
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: (OffsetDateTime::now_utc() + ttl).unix_timestamp(),
    };

    encode(
        &Header::new(auth.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(auth.jwt_secret.as_bytes()),
    )
    .map_err(|_| SecurityError::TokenSigning)
}

pub(crate) fn verify_token(token: &str, auth: &AuthSettings) -> Result<Claims, SecurityError> {
    let mut validation = Validation::new(auth.jwt_algorithm);
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(token, &DecodingKey::from_secret(auth.jwt_secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| SecurityError::TokenRejected)
}

/// Hex SHA-256 of a signature payload, stored next to it for tamper checks.
pub(crate) fn signature_digest(signature_data: &str) -> String {
    hex::encode(Sha256::digest(signature_data.as_bytes()))
}
