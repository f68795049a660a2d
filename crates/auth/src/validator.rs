//! Token verification (signature + claims window).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use thiserror::Error;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};

/// Why a presented token was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("malformed token")]
    Malformed,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}

/// Verifies a bearer token and returns its claims.
///
/// The HTTP layer holds an `Arc<dyn JwtValidator>` so middleware and tests
/// never depend on a concrete signing scheme.
pub trait JwtValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, AuthError>;
}

/// HMAC-SHA256 validator over a shared secret.
pub struct Hs256JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Claims carry RFC 3339 timestamps (`issued_at` / `expires_at`), not
        // the numeric `exp`/`iat` registered claims, so the time window is
        // checked by `validate_claims` rather than the decoder.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(&secret),
            validation,
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, AuthError> {
        let data = decode::<JwtClaims>(token, &self.decoding_key, &self.validation).map_err(
            |e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            },
        )?;
        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use reelhouse_core::UserId;

    use super::*;

    const SECRET: &[u8] = b"test-secret-not-for-production";

    fn mint(claims: &JwtClaims, secret: &[u8]) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn fresh_claims(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: UserId::new(),
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn accepts_a_well_signed_current_token() {
        let now = Utc::now();
        let claims = fresh_claims(now);
        let token = mint(&claims, SECRET);

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        let validated = validator.validate(&token, now).unwrap();
        assert_eq!(validated.sub, claims.sub);
    }

    #[test]
    fn rejects_a_token_signed_with_another_secret() {
        let now = Utc::now();
        let token = mint(&fresh_claims(now), b"some-other-secret");

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        assert_eq!(
            validator.validate(&token, now),
            Err(AuthError::InvalidSignature)
        );
    }

    #[test]
    fn rejects_an_expired_token() {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: UserId::new(),
            issued_at: now - Duration::hours(2),
            expires_at: now - Duration::hours(1),
        };
        let token = mint(&claims, SECRET);

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        assert_eq!(
            validator.validate(&token, now),
            Err(AuthError::Claims(TokenValidationError::Expired))
        );
    }

    #[test]
    fn rejects_garbage_tokens() {
        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        assert_eq!(
            validator.validate("not.a.jwt", Utc::now()),
            Err(AuthError::Malformed)
        );
        assert_eq!(
            validator.validate("", Utc::now()),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn rejects_tokens_with_incomplete_claims() {
        // Structurally valid JWT whose payload lacks the expected fields.
        #[derive(serde::Serialize)]
        struct Partial {
            sub: String,
        }
        let token = encode(
            &Header::new(Algorithm::HS256),
            &Partial {
                sub: "someone".into(),
            },
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        assert_eq!(
            validator.validate(&token, Utc::now()),
            Err(AuthError::Malformed)
        );
    }
}
