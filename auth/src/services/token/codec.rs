use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

use identity::VerifyError;

/// Claims carried by a session token. Nothing else goes in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userID")]
    pub user_id: i64,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i64, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("subject id must be positive")]
    InvalidSubject,

    #[error("token lifetime must be at least one hour")]
    InvalidTtl,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// HS256 encoder/decoder. The shared secret is handed in at construction.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        jsonwebtoken::encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!(error = %e, "failed to sign JWT");
            TokenError::Signing(e)
        })
    }

    /// Signature first, then expiry (zero leeway), then the subject claim.
    pub fn decode(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => VerifyError::InvalidClaims,
                _ => VerifyError::InvalidSignature,
            })?;

        if data.claims.user_id <= 0 {
            return Err(VerifyError::InvalidClaims);
        }

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn codec() -> TokenCodec {
        TokenCodec::new(b"test-secret")
    }

    fn claims(user_id: i64, lifetime: Duration) -> Claims {
        let now = Utc::now();
        Claims::new(user_id, now, now + lifetime)
    }

    #[test]
    fn claim_names_on_the_wire() {
        let value = serde_json::to_value(Claims {
            user_id: 5,
            iat: 10,
            exp: 20,
        })
        .unwrap();
        assert_eq!(value, serde_json::json!({ "userID": 5, "iat": 10, "exp": 20 }));
    }

    #[test]
    fn decodes_what_it_encodes() {
        let c = codec();
        let original = claims(42, Duration::hours(1));
        let token = c.encode(&original).unwrap();
        assert_eq!(c.decode(&token).unwrap(), original);
    }

    #[test]
    fn expired_token_is_rejected() {
        let c = codec();
        let token = c.encode(&claims(42, Duration::seconds(-5))).unwrap();
        assert_eq!(c.decode(&token), Err(VerifyError::Expired));
    }

    #[test]
    fn foreign_key_is_an_invalid_signature() {
        let token = TokenCodec::new(b"someone-else")
            .encode(&claims(42, Duration::hours(1)))
            .unwrap();
        assert_eq!(codec().decode(&token), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn garbage_is_an_invalid_signature() {
        assert_eq!(codec().decode("not-a-jwt"), Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn non_positive_subject_is_rejected() {
        let c = codec();
        let token = c.encode(&claims(0, Duration::hours(1))).unwrap();
        assert_eq!(c.decode(&token), Err(VerifyError::InvalidClaims));
    }
}
