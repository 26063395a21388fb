use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::claims::Claims;
use crate::error::AuthError;
use crate::service::TokenService;

/// Verified claims of the current request, taken from whichever source the
/// shared [`TokenService`] is configured for.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: Claims,
}

impl AuthContext {
    pub fn check_subject(&self, salt: &str) -> bool {
        self.claims.check_subject(salt)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.claims.has_role(role)
    }

    pub fn into_claims(self) -> Claims {
        self.claims
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let service = Arc::<TokenService>::from_ref(state);
        let claims = service.unsign(parts)?;
        Ok(Self { claims })
    }
}
