use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub admin: bool,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, admin: bool, expiry_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email,
            admin,
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

/// Resolved caller identity, injected into request extensions by the auth
/// middleware.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { id: claims.sub, email: claims.email, admin: claims.admin }
    }
}

/// The owner-or-admin rule. Every job mutation goes through this single
/// predicate; read paths use it only to compute capability flags.
pub fn can_modify(identity: &AuthUser, resource_owner_id: Uuid) -> bool {
    identity.id == resource_owner_id || identity.admin
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("JWT secret not configured")]
    MissingSecret,
    #[error("token generation failed: {0}")]
    Generation(String),
    #[error("invalid token: {0}")]
    Invalid(String),
}

pub fn issue_token(claims: &Claims, auth: &AuthConfig) -> Result<String, TokenError> {
    if auth.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let key = EncodingKey::from_secret(auth.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &key).map_err(|e| TokenError::Generation(e.to_string()))
}

pub fn verify_token(token: &str, auth: &AuthConfig) -> Result<Claims, TokenError> {
    if auth.jwt_secret.is_empty() {
        return Err(TokenError::MissingSecret);
    }
    let key = DecodingKey::from_secret(auth.jwt_secret.as_bytes());
    let data = decode::<Claims>(token, &key, &Validation::default())
        .map_err(|e| TokenError::Invalid(e.to_string()))?;
    Ok(data.claims)
}

pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST)
}

pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}
