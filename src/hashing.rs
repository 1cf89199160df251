use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use std::sync::Arc;

use crate::error::ApiError;

// 1. PasswordHasher Contract
/// PasswordHasher
///
/// The one-way digest capability used by the Credential Store. Handlers only ever see the
/// digest string; the algorithm behind it can be swapped without touching them.
///
/// Both operations are CPU bound and synchronous. Callers on the async runtime run them
/// through `tokio::task::spawn_blocking`.
pub trait PasswordHasher: Send + Sync {
    /// Produces a salted, self-describing digest (PHC string format).
    fn hash(&self, password: &str) -> Result<String, ApiError>;

    /// Returns true when `password` matches `digest`. A digest that cannot be parsed never
    /// matches.
    fn verify(&self, password: &str, digest: &str) -> bool;
}

// 2. The Real Implementation (Argon2id)
/// Argon2Hasher
///
/// Argon2id with the crate's recommended parameters by default. Lower-cost parameters are
/// available through `with_params` for test suites that hash many passwords.
#[derive(Clone)]
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl Argon2Hasher {
    /// with_params
    ///
    /// * `m_cost`: memory size in KiB.
    /// * `t_cost`: number of iterations.
    /// * `p_cost`: degree of parallelism.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, ApiError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| ApiError::internal(format!("invalid argon2 params: {e}")))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, ApiError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| ApiError::internal(format!("password hashing failed: {e}")))
    }

    fn verify(&self, password: &str, digest: &str) -> bool {
        match PasswordHash::new(digest) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("stored password digest is unreadable: {}", e);
                false
            }
        }
    }
}

/// HasherState
///
/// The concrete type used to share the hashing capability across the application state.
pub type HasherState = Arc<dyn PasswordHasher>;
