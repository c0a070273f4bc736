//! Session tokens: HS256 JWTs carrying the account id and role.
//!
//! Validation checks the signature and expiry only. There is no revocation
//! list, so a token stays valid for its full lifetime.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::Role;

pub const TOKEN_TTL_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Account id
    pub sub: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, account_id: Uuid, role: Role, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            sub: account_id,
            role,
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to sign token: {e}")))
    }

    pub fn validate(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!("Rejected token: {e}");
                AppError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_validate() {
        let tokens = TokenService::new("test-secret");
        let id = Uuid::new_v4();
        let now = Utc::now();
        let token = tokens.issue(id, Role::Admin, now).unwrap();
        let claims = tokens.validate(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let tokens = TokenService::new("test-secret");
        let issued = Utc::now() - Duration::days(TOKEN_TTL_DAYS + 1);
        let token = tokens.issue(Uuid::new_v4(), Role::User, issued).unwrap();
        assert!(matches!(tokens.validate(&token), Err(AppError::Unauthorized(_))));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let ours = TokenService::new("test-secret");
        let theirs = TokenService::new("other-secret");
        let token = theirs.issue(Uuid::new_v4(), Role::User, Utc::now()).unwrap();
        assert!(ours.validate(&token).is_err());
        assert!(ours.validate("not-a-jwt").is_err());
    }
}
