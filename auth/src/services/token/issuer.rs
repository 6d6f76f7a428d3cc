use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};

use crate::services::token::codec::{Claims, TokenCodec, TokenError};

#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues session tokens for subjects that already proved who they are.
#[derive(Clone)]
pub struct TokenIssuer {
    codec: Arc<TokenCodec>,
    default_ttl_hours: u32,
}

impl TokenIssuer {
    pub fn new(codec: Arc<TokenCodec>, default_ttl_hours: u32) -> Self {
        Self {
            codec,
            default_ttl_hours,
        }
    }

    pub fn default_ttl_hours(&self) -> u32 {
        self.default_ttl_hours
    }

    /// `ttl_hours` falls back to the configured lifetime.
    pub fn issue(&self, subject_id: i64, ttl_hours: Option<u32>) -> Result<IssuedToken, TokenError> {
        if subject_id <= 0 {
            return Err(TokenError::InvalidSubject);
        }
        let ttl_hours = ttl_hours.unwrap_or(self.default_ttl_hours);
        if ttl_hours == 0 {
            return Err(TokenError::InvalidTtl);
        }

        let now = Utc::now();
        let expires_at = TimeDelta::try_hours(i64::from(ttl_hours))
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::InvalidTtl)?;
        let token = self.codec.encode(&Claims::new(subject_id, now, expires_at))?;

        Ok(IssuedToken { token, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> (TokenIssuer, Arc<TokenCodec>) {
        let codec = Arc::new(TokenCodec::new(b"issuer-secret"));
        (TokenIssuer::new(codec.clone(), 24), codec)
    }

    #[test]
    fn issued_token_carries_the_subject() {
        let (issuer, codec) = issuer();
        let issued = issuer.issue(42, Some(2)).unwrap();
        let claims = codec.decode(&issued.token).unwrap();

        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 2 * 3600);
    }

    #[test]
    fn default_lifetime_applies() {
        let (issuer, codec) = issuer();
        let issued = issuer.issue(7, None).unwrap();
        let claims = codec.decode(&issued.token).unwrap();
        assert_eq!(claims.exp - claims.iat, 24 * 3600);
    }

    #[test]
    fn rejects_bad_input() {
        let (issuer, _) = issuer();
        assert!(matches!(issuer.issue(0, None), Err(TokenError::InvalidSubject)));
        assert!(matches!(issuer.issue(-3, None), Err(TokenError::InvalidSubject)));
        assert!(matches!(issuer.issue(1, Some(0)), Err(TokenError::InvalidTtl)));
    }

    #[test]
    fn out_of_range_lifetime_is_rejected() {
        let (issuer, _) = issuer();
        assert!(matches!(issuer.issue(42, Some(u32::MAX)), Err(TokenError::InvalidTtl)));
    }

    #[test]
    fn large_but_representable_lifetime_still_verifies() {
        let (issuer, codec) = issuer();
        let issued = issuer.issue(42, Some(1_000_000)).unwrap();
        assert_eq!(codec.decode(&issued.token).unwrap().user_id, 42);
    }
}
