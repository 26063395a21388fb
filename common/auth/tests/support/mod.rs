#![allow(dead_code)]

use common_authorizer::{Claims, Clock, ServiceConfig, TokenService, TokenSource};
use serde_json::json;
use uuid::Uuid;

pub const PRIVATE_PEM: &str = include_str!("../fixtures/rsa_private.pem");
pub const PUBLIC_PEM: &str = include_str!("../fixtures/rsa_public.pem");
pub const OTHER_PUBLIC_PEM: &str = include_str!("../fixtures/other_rsa_public.pem");

pub const SALT: &str = "482913570264";

pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn config(source: TokenSource) -> ServiceConfig {
    ServiceConfig::new(PRIVATE_PEM, PUBLIC_PEM)
        .with_token_source(source)
        .with_expiry_minutes(1400)
}

pub fn service(source: TokenSource) -> TokenService {
    TokenService::new(config(source))
}

pub fn claims_expiring_at(expires_at: i64) -> Claims {
    Claims {
        issuer: "ci-test".into(),
        subject: SALT.into(),
        audience: "ci-verifier-aud".into(),
        id: Uuid::new_v4().to_string(),
        expires_at,
        meta_info: Some(json!({ "more": "Lorem ipsum dolor sit amet." })),
        ..Default::default()
    }
}
