use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

/// Signs and checks session tokens. Verification never touches the database.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: &str) -> Result<String, ServiceError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<String, ServiceError> {
        let claims = Claims {
            user_id: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("failed to sign token: {}", e))?;
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn issued_token_carries_user_id() {
        let tokens = issuer();
        let token = tokens.issue("user-1").unwrap();
        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, "user-1");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let tokens = issuer();
        let token = tokens
            .issue_at("user-1", Utc::now() - Duration::hours(2))
            .unwrap();
        assert!(matches!(
            tokens.verify(&token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn foreign_or_tampered_token_is_rejected() {
        let token = TokenIssuer::new("other-secret", Duration::hours(1))
            .issue("user-1")
            .unwrap();
        assert!(matches!(
            issuer().verify(&token),
            Err(ServiceError::TokenInvalid)
        ));

        let mut token = issuer().issue("user-1").unwrap();
        token.push('x');
        assert!(matches!(
            issuer().verify(&token),
            Err(ServiceError::TokenInvalid)
        ));
        assert!(matches!(
            issuer().verify("not-a-token"),
            Err(ServiceError::TokenInvalid)
        ));
    }
}
