//! Signed bearer tokens
//!
//! Format: `"<user_id>.<expires_ms>.<hex HMAC-SHA256(secret, "<user_id>.<expires_ms>")>"`.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Why a token was rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error("bad token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,
}

/// Issues and verifies tokens with one shared secret
#[derive(Clone)]
pub struct TokenSigner {
    secret: Vec<u8>,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<Vec<u8>>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }

    fn mac(&self) -> HmacSha256 {
        // HMAC accepts keys of any length
        match HmacSha256::new_from_slice(&self.secret) {
            Ok(mac) => mac,
            Err(_) => unreachable!("HMAC key length is unrestricted"),
        }
    }

    /// Token for `user_id` valid until `now + ttl`
    pub fn issue(&self, user_id: i64, now: DateTime<Utc>) -> String {
        let expires = (now + self.ttl).timestamp_millis();
        let payload = format!("{}.{}", user_id, expires);
        let mut mac = self.mac();
        mac.update(payload.as_bytes());
        format!("{}.{}", payload, hex::encode(mac.finalize().into_bytes()))
    }

    /// Return the user id carried by a valid, unexpired token
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<i64, TokenError> {
        let mut parts = token.trim().splitn(3, '.');
        let (Some(user), Some(expires), Some(signature)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenError::Malformed);
        };

        let user_id: i64 = user.parse().map_err(|_| TokenError::Malformed)?;
        let expires_ms: i64 = expires.parse().map_err(|_| TokenError::Malformed)?;
        let signature = hex::decode(signature).map_err(|_| TokenError::Malformed)?;

        let mut mac = self.mac();
        mac.update(format!("{}.{}", user, expires).as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::BadSignature)?;

        if now.timestamp_millis() >= expires_ms {
            return Err(TokenError::Expired);
        }
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn test_issue_and_verify() {
        let now = Utc::now();
        let token = signer().issue(42, now);
        assert_eq!(signer().verify(&token, now), Ok(42));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now();
        let token = signer().issue(42, now);
        let later = now + Duration::hours(2);
        assert_eq!(signer().verify(&token, later), Err(TokenError::Expired));
    }

    #[test]
    fn test_tampered_token() {
        let now = Utc::now();
        let token = signer().issue(42, now);
        let forged = token.replacen("42.", "43.", 1);
        assert_eq!(signer().verify(&forged, now), Err(TokenError::BadSignature));

        let other = TokenSigner::new("other-secret", Duration::hours(1));
        assert_eq!(other.verify(&token, now), Err(TokenError::BadSignature));
    }

    #[test]
    fn test_malformed_token() {
        let now = Utc::now();
        assert_eq!(signer().verify("", now), Err(TokenError::Malformed));
        assert_eq!(signer().verify("a.b.c", now), Err(TokenError::Malformed));
        assert_eq!(signer().verify("1.2.zz", now), Err(TokenError::Malformed));
    }
}
