use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::Algorithm;
use serde::Serialize;
use thiserror::Error;

use crate::claims::TokenInvalidity;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing required parameters")]
    MissingParameters,
    #[error("invalid key material: {0}")]
    KeyFormat(String),
    #[error("unexpected signing method: {0:?}")]
    AlgorithmMismatch(Algorithm),
    #[error("empty token")]
    EmptyToken,
    #[error("token signature or format error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    InvalidToken(#[from] TokenInvalidity),
    #[error("fail convert claims: {0}")]
    ClaimsConversion(String),
    #[error("missing configuration value '{0}'")]
    MissingConfig(&'static str),
    #[error("token lifetime of {0} minutes is out of range")]
    ExpiryOutOfRange(i64),
}

impl AuthError {
    /// True when the token was rejected because its `exp` has passed.
    pub fn is_expired(&self) -> bool {
        matches!(self, AuthError::InvalidToken(TokenInvalidity::Expired))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AuthError::EmptyToken => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_MISSING"),
            AuthError::AlgorithmMismatch(_) | AuthError::Jwt(_) | AuthError::InvalidToken(_) => {
                (StatusCode::UNAUTHORIZED, "AUTH_TOKEN")
            }
            AuthError::ClaimsConversion(_) => (StatusCode::UNAUTHORIZED, "AUTH_CLAIMS"),
            AuthError::MissingParameters => (StatusCode::BAD_REQUEST, "AUTH_PARAMS"),
            AuthError::KeyFormat(_) | AuthError::MissingConfig(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_KEY")
            }
            AuthError::ExpiryOutOfRange(_) => (StatusCode::INTERNAL_SERVER_ERROR, "AUTH_CONFIG"),
        };

        let body = ErrorBody {
            code,
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
