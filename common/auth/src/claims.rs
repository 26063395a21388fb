use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{AuthError, AuthResult};
use crate::subject;

/// Payload carried inside a signed token.
///
/// `subject` holds the caller's raw salt before signing and the derived
/// fingerprint afterwards (see [`Claims::bind_subject`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "iss", default, skip_serializing_if = "String::is_empty")]
    pub issuer: String,
    #[serde(rename = "sub", default, skip_serializing_if = "String::is_empty")]
    pub subject: String,
    #[serde(rename = "aud", default, skip_serializing_if = "String::is_empty")]
    pub audience: String,
    #[serde(rename = "jti", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Unix seconds; zero means "not set yet".
    #[serde(rename = "exp", default, skip_serializing_if = "is_unset")]
    pub expires_at: i64,
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<i64>,
    /// Opaque caller data, carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Details>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Details {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl Details {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|value| value == role)
    }
}

/// Reason a signature-valid token is still refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenInvalidity {
    #[error("token has expired")]
    Expired,
    #[error("token is not valid yet")]
    NotYetValid,
    #[error("token used before issued")]
    IssuedInFuture,
}

fn is_unset(value: &i64) -> bool {
    *value == 0
}

impl Claims {
    /// Fingerprint of `salt` bound to this claim set's issuer and expiry.
    pub fn fingerprint(&self, salt: &str) -> String {
        subject::bind_subject(&self.issuer, self.expires_at, salt)
    }

    /// Replaces a non-empty `subject` (the raw salt) with its fingerprint,
    /// using whatever `expires_at` holds right now. Empty subjects are left alone.
    pub fn bind_subject(&mut self) {
        if !self.subject.is_empty() {
            self.subject = self.fingerprint(&self.subject);
        }
    }

    /// Recomputes the fingerprint for `salt` and compares it to `subject`.
    pub fn check_subject(&self, salt: &str) -> bool {
        subject::subject_matches(self, salt)
    }

    /// Time checks against `now` (unix seconds). A token is valid only while
    /// `now` is strictly before `exp`.
    pub fn validate_at(&self, now: i64) -> Result<(), TokenInvalidity> {
        if now >= self.expires_at {
            return Err(TokenInvalidity::Expired);
        }
        if let Some(issued_at) = self.issued_at {
            if now < issued_at {
                return Err(TokenInvalidity::IssuedInFuture);
            }
        }
        if let Some(not_before) = self.not_before {
            if now < not_before {
                return Err(TokenInvalidity::NotYetValid);
            }
        }
        Ok(())
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.details
            .as_ref()
            .is_some_and(|details| details.has_role(role))
    }
}

impl TryFrom<serde_json::Value> for Claims {
    type Error = AuthError;

    fn try_from(value: serde_json::Value) -> AuthResult<Self> {
        serde_json::from_value(value).map_err(|err| AuthError::ClaimsConversion(err.to_string()))
    }
}
