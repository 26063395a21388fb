//! Locating the raw token string on an inbound request.

use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, Request, Uri};
use tracing::debug;

use crate::config::TokenSource;

const BEARER_PREFIX: &str = "Bearer ";

/// The two lookups token extraction needs from a request.
pub trait TokenRequest {
    /// First value of header `name`, if present and valid text.
    fn header(&self, name: &str) -> Option<&str>;

    /// First value of query parameter `name`, percent-decoded.
    fn query_param(&self, name: &str) -> Option<String>;
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn query_value(uri: &Uri, name: &str) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

impl TokenRequest for Parts {
    fn header(&self, name: &str) -> Option<&str> {
        header_value(&self.headers, name)
    }

    fn query_param(&self, name: &str) -> Option<String> {
        query_value(&self.uri, name)
    }
}

impl<B> TokenRequest for Request<B> {
    fn header(&self, name: &str) -> Option<&str> {
        header_value(self.headers(), name)
    }

    fn query_param(&self, name: &str) -> Option<String> {
        query_value(self.uri(), name)
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

/// Token from `Authorization: Bearer <token>`; the scheme is matched
/// case-insensitively and must be followed by a non-blank token.
pub fn token_from_bearer<R: TokenRequest + ?Sized>(request: &R) -> Option<String> {
    let value = request.header(AUTHORIZATION.as_str())?;
    let scheme = value.get(..BEARER_PREFIX.len())?;
    if !scheme.eq_ignore_ascii_case(BEARER_PREFIX) {
        return None;
    }
    non_empty(&value[BEARER_PREFIX.len()..])
}

pub fn token_from_header<R: TokenRequest + ?Sized>(request: &R, key: &str) -> Option<String> {
    request.header(key).and_then(non_empty)
}

pub fn token_from_query<R: TokenRequest + ?Sized>(request: &R, key: &str) -> Option<String> {
    request.query_param(key).as_deref().and_then(non_empty)
}

impl TokenSource {
    /// First non-empty token in precedence order; later sources are not consulted.
    pub fn extract<R: TokenRequest + ?Sized>(&self, request: &R) -> Option<String> {
        let mut token = None;

        if self.use_bearer {
            token = token_from_bearer(request);
        }
        if token.is_none() {
            if let Some(key) = self.header_name() {
                token = token_from_header(request, key);
            }
        }
        if token.is_none() {
            if let Some(key) = self.query_name() {
                token = token_from_query(request, key);
            }
        }

        if token.is_none() {
            debug!(
                bearer = self.use_bearer,
                header = self.header_name(),
                query = self.query_name(),
                "no token found on request"
            );
        }
        token
    }
}
