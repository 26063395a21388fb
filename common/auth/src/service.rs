use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, decode_header, encode, Header, Validation};
use serde_json::Value;
use tracing::debug;

use crate::claims::Claims;
use crate::config::ServiceConfig;
use crate::error::{AuthError, AuthResult};
use crate::extract::TokenRequest;
use crate::keys::{self, KeyCache, PublicKeyResolver, ACCEPTED_ALGORITHMS, SIGNING_ALGORITHM};

/// Source of "now" in unix seconds for expiry defaults and validity checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }
}

/// Signs claim sets and verifies tokens taken from requests.
///
/// Stateless apart from configuration: every call parses the key material
/// it needs unless a [`KeyCache`] was installed with [`TokenService::with_key_cache`].
#[derive(Clone)]
pub struct TokenService {
    config: ServiceConfig,
    clock: Arc<dyn Clock>,
    key_cache: Option<KeyCache>,
}

impl TokenService {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config: config.normalized(),
            clock: Arc::new(SystemClock),
            key_cache: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_key_cache(mut self, cache: KeyCache) -> Self {
        self.key_cache = Some(cache);
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Signs `claims` with RS256 and returns the compact token.
    ///
    /// The claim set is updated in place: a non-empty `subject` is replaced by
    /// its fingerprint first, then a missing `exp` is filled from the configured
    /// lifetime. Binding therefore sees `exp = 0` when the caller left it unset.
    pub fn sign(&self, claims: Option<&mut Claims>) -> AuthResult<String> {
        let claims = claims.ok_or(AuthError::MissingParameters)?;

        claims.bind_subject();

        if claims.expires_at == 0 {
            let minutes = self.config.expiry_minutes;
            claims.expires_at = minutes
                .checked_mul(60)
                .and_then(|seconds| self.clock.now().checked_add(seconds))
                .ok_or(AuthError::ExpiryOutOfRange(minutes))?;
        }

        let key = match &self.key_cache {
            Some(cache) => cache.encoding_key(&self.config.private_key)?,
            None => keys::parse_private_key(&self.config.private_key)?,
        };

        let token = encode(&Header::new(SIGNING_ALGORITHM), &*claims, &key)?;
        debug!(iss = %claims.issuer, jti = %claims.id, exp = claims.expires_at, "signed token");
        Ok(token)
    }

    /// Extracts the token from `request` per the configured sources and verifies it.
    ///
    /// Subject checks are left to the caller ([`Claims::check_subject`]).
    pub fn unsign<R: TokenRequest + ?Sized>(&self, request: &R) -> AuthResult<Claims> {
        let token = self
            .config
            .token_source
            .extract(request)
            .ok_or(AuthError::EmptyToken)?;
        self.verify_token(&token)
    }

    /// Verifies signature, algorithm and time window of a compact token.
    pub fn verify_token(&self, token: &str) -> AuthResult<Claims> {
        let header = decode_header(token)?;
        let key = self.public_key().resolve(&header)?;

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.set_required_spec_claims(&["exp"]);
        // Time checks run against `self.clock` below.
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        let data = decode::<Value>(token, &key, &validation)?;
        let claims = Claims::try_from(data.claims)?;
        claims.validate_at(self.clock.now())?;

        debug!(iss = %claims.issuer, jti = %claims.id, alg = ?header.alg, "verified token");
        Ok(claims)
    }

    fn public_key(&self) -> PublicKeyResolver<'_> {
        match &self.key_cache {
            Some(cache) => cache.public_key(&self.config.public_key),
            None => keys::parse_public_key(&self.config.public_key),
        }
    }
}
