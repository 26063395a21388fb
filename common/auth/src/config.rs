use std::env;

use crate::error::{AuthError, AuthResult};

pub const ENV_PRIVATE_KEY: &str = "AUTHORIZER_PRIVATE_KEY";
pub const ENV_PUBLIC_KEY: &str = "AUTHORIZER_PUBLIC_KEY";
pub const ENV_TOKEN_HEADER: &str = "AUTHORIZER_TOKEN_HEADER";
pub const ENV_TOKEN_QUERY: &str = "AUTHORIZER_TOKEN_QUERY";
pub const ENV_USE_BEARER: &str = "AUTHORIZER_USE_BEARER";
pub const ENV_EXPIRY_MINUTES: &str = "AUTHORIZER_EXPIRY_MINUTES";

/// Fallback values applied when a service is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenDefaults {
    pub header_key: &'static str,
    pub query_key: &'static str,
    pub expiry_minutes: i64,
}

pub const DEFAULTS: TokenDefaults = TokenDefaults {
    header_key: "X-AuthVerifierToken",
    query_key: "verifier",
    expiry_minutes: 2800,
};

/// Where inbound tokens are looked up. Precedence is fixed:
/// bearer header, then the named header, then the query parameter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSource {
    pub header_key: Option<String>,
    pub query_key: Option<String>,
    pub use_bearer: bool,
}

impl TokenSource {
    pub fn bearer() -> Self {
        Self {
            use_bearer: true,
            ..Self::default()
        }
    }

    pub fn header(key: impl Into<String>) -> Self {
        Self::default().with_header(key)
    }

    pub fn query(key: impl Into<String>) -> Self {
        Self::default().with_query(key)
    }

    /// Every source enabled, using the default header and query names.
    pub fn with_defaults() -> Self {
        Self {
            header_key: Some(DEFAULTS.header_key.to_string()),
            query_key: Some(DEFAULTS.query_key.to_string()),
            use_bearer: true,
        }
    }

    pub fn with_header(mut self, key: impl Into<String>) -> Self {
        self.header_key = Some(key.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>) -> Self {
        self.query_key = Some(key.into());
        self
    }

    pub fn with_bearer(mut self, enabled: bool) -> Self {
        self.use_bearer = enabled;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.use_bearer && self.header_name().is_none() && self.query_name().is_none()
    }

    pub(crate) fn header_name(&self) -> Option<&str> {
        self.header_key.as_deref().filter(|key| !key.is_empty())
    }

    pub(crate) fn query_name(&self) -> Option<&str> {
        self.query_key.as_deref().filter(|key| !key.is_empty())
    }
}

/// Key pair, token source and default lifetime for a [`crate::TokenService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// PEM text of the RSA private key used for signing.
    pub private_key: String,
    /// PEM text of the RSA public key used for verification.
    pub public_key: String,
    pub token_source: TokenSource,
    /// Lifetime given to tokens signed without `exp`. Non-positive means default.
    pub expiry_minutes: i64,
}

impl ServiceConfig {
    pub fn new(private_key: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            private_key: private_key.into(),
            public_key: public_key.into(),
            token_source: TokenSource::default(),
            expiry_minutes: 0,
        }
    }

    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.token_source = source;
        self
    }

    pub fn with_expiry_minutes(mut self, minutes: i64) -> Self {
        self.expiry_minutes = minutes;
        self
    }

    /// Copy with defaults filled in; run once when the service is built.
    pub(crate) fn normalized(mut self) -> Self {
        if self.expiry_minutes <= 0 {
            self.expiry_minutes = DEFAULTS.expiry_minutes;
        }
        self
    }

    /// Loads the configuration from `AUTHORIZER_*` environment variables.
    pub fn from_env() -> AuthResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ServiceConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> AuthResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let private_key = non_empty(ENV_PRIVATE_KEY).ok_or(AuthError::MissingConfig(ENV_PRIVATE_KEY))?;
        let public_key = non_empty(ENV_PUBLIC_KEY).ok_or(AuthError::MissingConfig(ENV_PUBLIC_KEY))?;

        let header_key = non_empty(ENV_TOKEN_HEADER).map(|value| value.trim().to_string());
        let query_key = non_empty(ENV_TOKEN_QUERY).map(|value| value.trim().to_string());
        let use_bearer = non_empty(ENV_USE_BEARER).map(|value| parse_bool(&value));

        let token_source = if header_key.is_none() && query_key.is_none() && use_bearer.is_none() {
            TokenSource::with_defaults()
        } else {
            TokenSource {
                header_key,
                query_key,
                use_bearer: use_bearer.unwrap_or(false),
            }
        };

        let expiry_minutes = non_empty(ENV_EXPIRY_MINUTES)
            .and_then(|value| value.trim().parse::<i64>().ok())
            .unwrap_or(0);

        Ok(Self {
            private_key,
            public_key,
            token_source,
            expiry_minutes,
        })
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn normalized_applies_default_expiry() {
        let config = ServiceConfig::new("priv", "pub").with_expiry_minutes(-5).normalized();
        assert_eq!(config.expiry_minutes, 2800);

        let config = ServiceConfig::new("priv", "pub").with_expiry_minutes(15).normalized();
        assert_eq!(config.expiry_minutes, 15);
    }

    #[test]
    fn empty_keys_do_not_count_as_sources() {
        let source = TokenSource::header("").with_query("");
        assert!(source.is_empty());
        assert!(!TokenSource::bearer().is_empty());
    }

    #[test]
    fn from_lookup_requires_both_keys() {
        let err = ServiceConfig::from_lookup(lookup(&[(ENV_PUBLIC_KEY, "pub")]))
            .expect_err("private key missing");
        assert!(matches!(err, AuthError::MissingConfig(ENV_PRIVATE_KEY)));

        let err = ServiceConfig::from_lookup(lookup(&[(ENV_PRIVATE_KEY, "priv")]))
            .expect_err("public key missing");
        assert!(matches!(err, AuthError::MissingConfig(ENV_PUBLIC_KEY)));
    }

    #[test]
    fn from_lookup_falls_back_to_default_sources() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_PRIVATE_KEY, "priv"),
            (ENV_PUBLIC_KEY, "pub"),
        ]))
        .expect("config");
        assert_eq!(config.token_source, TokenSource::with_defaults());
        assert_eq!(config.expiry_minutes, 0);
    }

    #[test]
    fn from_lookup_reads_explicit_sources() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ENV_PRIVATE_KEY, "priv"),
            (ENV_PUBLIC_KEY, "pub"),
            (ENV_TOKEN_QUERY, " _verify "),
            (ENV_USE_BEARER, "Yes"),
            (ENV_EXPIRY_MINUTES, "1400"),
        ]))
        .expect("config");
        assert_eq!(
            config.token_source,
            TokenSource::query("_verify").with_bearer(true)
        );
        assert_eq!(config.expiry_minutes, 1400);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("1"));
        assert!(parse_bool(" TRUE "));
        assert!(parse_bool("on"));
        assert!(!parse_bool("no"));
        assert!(!parse_bool("0"));
    }
}
