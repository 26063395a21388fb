//! Issues and verifies RS256-signed tokens for HTTP requests.
//!
//! A caller-supplied subject (salt) is bound to the token's issuer and expiry
//! with a digest at signing time; inbound tokens are read from a bearer header,
//! a named header or a query parameter and verified against the public key.

pub mod claims;
pub mod config;
pub mod error;
pub mod extract;
pub mod extractors;
pub mod keys;
pub mod service;
pub mod subject;

pub use claims::{Claims, Details, TokenInvalidity};
pub use config::{ServiceConfig, TokenDefaults, TokenSource, DEFAULTS};
pub use error::{AuthError, AuthResult};
pub use extract::{token_from_bearer, token_from_header, token_from_query, TokenRequest};
pub use extractors::AuthContext;
pub use keys::{parse_private_key, parse_public_key, KeyCache, PublicKeyResolver};
pub use service::{Clock, SystemClock, TokenService};
pub use subject::{bind_subject, subject_matches};
