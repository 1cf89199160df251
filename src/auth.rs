use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{config::AppConfig, error::ApiError, models::Identity, repository::RepositoryState};

/// Claims
///
/// Payload of the access token. Signed with the server's HS256 secret and validated on every
/// authenticated request.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (sub): the user id, as a decimal string.
    pub sub: String,
    /// Expiration Time (exp).
    pub exp: usize,
    /// Issued At (iat).
    pub iat: usize,
    /// Token id. Makes every issued credential distinct, even two issued in the same second.
    pub jti: Uuid,
}

/// TokenService
///
/// Issues and verifies the identity-bearing bearer credential. Built once from `AppConfig`
/// and shared through the application state.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.jwt_secret, Duration::minutes(config.jwt_ttl_minutes))
    }

    /// issue
    ///
    /// Signs a fresh credential for `user_id` expiring after the configured TTL.
    pub fn issue(&self, user_id: i64) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
            jti: Uuid::new_v4(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("token signing failed: {e}")))
    }

    /// verify
    ///
    /// Decodes `token` and returns the user id it was issued for. Expiry is reported as
    /// `CredentialExpired`; every other decoding failure (bad signature, garbage, non-numeric
    /// subject) as `InvalidCredential`.
    pub fn verify(&self, token: &str) -> Result<i64, ApiError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(
            |e| match e.kind() {
                ErrorKind::ExpiredSignature => ApiError::CredentialExpired,
                _ => ApiError::InvalidCredential("Invalid token".to_string()),
            },
        )?;

        token_data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| ApiError::InvalidCredential("Invalid token".to_string()))
    }
}

/// Role
///
/// Derived from the profiles a user owns; there is no stored role column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Worker,
    Employer,
}

/// AuthUser Extractor Result
///
/// The resolved identity of an authenticated request. Handlers take it as an argument and
/// use `id` as the owner of everything they create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
    pub is_worker: bool,
    pub is_employer: bool,
}

impl From<Identity> for AuthUser {
    fn from(identity: Identity) -> Self {
        Self {
            id: identity.user_id,
            is_worker: identity.has_worker_profile,
            is_employer: identity.has_employer_profile,
        }
    }
}

impl AuthUser {
    pub fn has_role(&self, role: Role) -> bool {
        match role {
            Role::Worker => self.is_worker,
            Role::Employer => self.is_employer,
        }
    }

    /// require
    ///
    /// Role gate of the Access Policy: `Forbidden` unless the caller holds `role`.
    pub fn require(&self, role: Role) -> Result<(), ApiError> {
        if self.has_role(role) {
            Ok(())
        } else {
            let needed = match role {
                Role::Worker => "worker",
                Role::Employer => "employer",
            };
            Err(ApiError::forbidden(format!(
                "This action requires the {needed} role"
            )))
        }
    }
}

/// AuthUser Extractor Implementation
///
/// Makes `AuthUser` usable as an argument in any authenticated handler. Identity is
/// re-resolved from the credential on every request:
/// 1. Token Extraction: `Authorization: Bearer <token>`, else `Unauthenticated`.
/// 2. Token Validation: signature and expiry via `TokenService`.
/// 3. DB Lookup: the subject must still exist; its roles come from the profiles it owns.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    RepositoryState: FromRef<S>,
    TokenService: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let repo = RepositoryState::from_ref(state);
        let tokens = TokenService::from_ref(state);

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                ApiError::Unauthenticated("Missing or invalid access token".to_string())
            })?;

        let user_id = tokens.verify(token)?;

        // A valid token whose user has since disappeared is not accepted.
        let identity = repo
            .resolve_identity(user_id)
            .await?
            .ok_or_else(|| ApiError::Unauthenticated("User not found".to_string()))?;

        tracing::debug!(user_id, "request authenticated");
        Ok(identity.into())
    }
}
