//! Subject binding: ties a token to its issuer, expiry and a caller-held salt.

use sha2::{Digest, Sha256};

use crate::claims::Claims;

/// Hex SHA-256 of `"{issuer}/{expires_at}/{salt}"`.
pub fn bind_subject(issuer: &str, expires_at: i64, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{issuer}/{expires_at}/{salt}").as_bytes());
    hex::encode(hasher.finalize())
}

/// Case-insensitive comparison of the recomputed fingerprint with `claims.subject`.
pub fn subject_matches(claims: &Claims, salt: &str) -> bool {
    bind_subject(&claims.issuer, claims.expires_at, salt).eq_ignore_ascii_case(&claims.subject)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fingerprint_is_fixed_length_hex() {
        let value = bind_subject("svc-a", 1_700_000_000, "user-42");
        assert_eq!(value.len(), 64);
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn fingerprint_matches_known_digest() {
        let expected = hex::encode(Sha256::digest(b"svc-a/0/user-42"));
        assert_eq!(bind_subject("svc-a", 0, "user-42"), expected);
    }

    #[test]
    fn match_ignores_case() {
        let claims = Claims {
            issuer: "svc-a".into(),
            expires_at: 5,
            subject: bind_subject("svc-a", 5, "salt").to_ascii_uppercase(),
            ..Default::default()
        };
        assert!(subject_matches(&claims, "salt"));
    }

    proptest! {
        #[test]
        fn binding_is_deterministic(issuer in ".{0,24}", exp in any::<i64>(), salt in ".{0,24}") {
            prop_assert_eq!(bind_subject(&issuer, exp, &salt), bind_subject(&issuer, exp, &salt));
        }

        #[test]
        fn changing_any_input_changes_fingerprint(
            issuer in "[a-z]{1,12}",
            exp in 0i64..4_000_000_000,
            salt in "[0-9]{1,12}",
        ) {
            let base = bind_subject(&issuer, exp, &salt);
            prop_assert_ne!(&base, &bind_subject(&format!("{issuer}x"), exp, &salt));
            prop_assert_ne!(&base, &bind_subject(&issuer, exp + 1, &salt));
            prop_assert_ne!(&base, &bind_subject(&issuer, exp, &format!("{salt}0")));
        }
    }
}
