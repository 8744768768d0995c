use acmeair_core::{AuthGuard, CoreError, CoreResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CustomerClaims {
    pub sub: String,
    pub exp: usize,
}

/// HS256 guard checking that the token's subject is the user being acted on.
#[derive(Clone)]
pub struct JwtGuard {
    secret: String,
    secure_user_calls: bool,
}

impl JwtGuard {
    pub fn new(secret: impl Into<String>, secure_user_calls: bool) -> Self {
        Self {
            secret: secret.into(),
            secure_user_calls,
        }
    }

    /// Sign a token for `user_id` that expires after `ttl_seconds`.
    pub fn issue_token(&self, user_id: &str, ttl_seconds: i64) -> CoreResult<String> {
        let claims = CustomerClaims {
            sub: user_id.to_owned(),
            exp: (Utc::now() + Duration::seconds(ttl_seconds)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| CoreError::InternalError(format!("Token encoding failed: {}", e)))
    }
}

impl AuthGuard for JwtGuard {
    fn secure_user_calls(&self) -> bool {
        self.secure_user_calls
    }

    fn validate_jwt(&self, user_id: &str, token: Option<&str>) -> bool {
        let Some(token) = token else {
            debug!("No token presented for {}", user_id);
            return false;
        };

        match decode::<CustomerClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => data.claims.sub == user_id,
            Err(e) => {
                debug!("Token rejected for {}: {}", user_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_matches_subject() {
        let guard = JwtGuard::new("secret", true);
        let token = guard.issue_token("u1", 60).unwrap();

        assert!(guard.validate_jwt("u1", Some(&token)));
        assert!(!guard.validate_jwt("u2", Some(&token)));
    }

    #[test]
    fn test_missing_or_foreign_token_is_rejected() {
        let guard = JwtGuard::new("secret", true);
        let other = JwtGuard::new("another-secret", true);
        let token = other.issue_token("u1", 60).unwrap();

        assert!(!guard.validate_jwt("u1", None));
        assert!(!guard.validate_jwt("u1", Some(&token)));
        assert!(!guard.validate_jwt("u1", Some("not-a-jwt")));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let guard = JwtGuard::new("secret", true);
        let token = guard.issue_token("u1", -3600).unwrap();
        assert!(!guard.validate_jwt("u1", Some(&token)));
    }
}
