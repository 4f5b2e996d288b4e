use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::MIN_JWT_SECRET_LEN;

/// Session tokens are valid for one hour from issuance
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, issued_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature is invalid")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed: {0}")]
    Malformed(String),

    #[error("token generation failed: {0}")]
    Encoding(String),

    #[error("signing secret is not configured")]
    MissingSecret,

    #[error("signing secret is shorter than {MIN_JWT_SECRET_LEN} bytes")]
    WeakSecret,
}

/// Issues and verifies HS256 session tokens carrying a user id
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    /// Build from the process signing secret. There is no fallback secret.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(TokenError::WeakSecret);
        }

        // Expiry is checked in verify_at against an explicit clock
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let claims = Claims::new(user_id, now);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Check signature, then expiry against `now`. Valid while `now < exp`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            }
        })?;

        if now.timestamp() >= data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hs256";
    const OTHER_SECRET: &str = "another-secret-that-is-long-enough-for-hs256";

    fn service() -> TokenService {
        TokenService::new(SECRET).unwrap()
    }

    #[test]
    fn refuses_missing_or_weak_secret() {
        assert_eq!(TokenService::new("").err(), Some(TokenError::MissingSecret));
        assert_eq!(TokenService::new("secretkey").err(), Some(TokenError::WeakSecret));
    }

    #[test]
    fn issued_token_round_trips_user_id() {
        let tokens = service();
        let user_id = Uuid::new_v4();
        let token = tokens.issue(user_id).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn accepted_before_one_hour_rejected_after() {
        let tokens = service();
        let issued = Utc::now();
        let token = tokens.issue_at(Uuid::new_v4(), issued).unwrap();

        assert!(tokens
            .verify_at(&token, issued + Duration::minutes(59))
            .is_ok());
        assert_eq!(
            tokens.verify_at(&token, issued + Duration::minutes(61)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn token_from_other_secret_has_invalid_signature() {
        let foreign = TokenService::new(OTHER_SECRET).unwrap();
        let token = foreign.issue(Uuid::new_v4()).unwrap();
        assert_eq!(service().verify(&token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn tampered_payload_has_invalid_signature() {
        let tokens = service();
        let token = tokens.issue(Uuid::new_v4()).unwrap();
        let forged = tokens.issue(Uuid::new_v4()).unwrap();

        // Splice the payload of one token onto the signature of another
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];
        let spliced = parts.join(".");

        assert_eq!(tokens.verify(&spliced), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            service().verify("not-a-token"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn claims_use_user_id_wire_name() {
        let claims = Claims::new(Uuid::nil(), Utc::now());
        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("userId").is_some());
        assert!(value.get("user_id").is_none());
    }
}
