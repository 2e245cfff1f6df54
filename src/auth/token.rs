//! Signed session cookie values

use crate::auth::models::Session;
use crate::error::{Error, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the signed session
pub const SESSION_COOKIE_NAME: &str = "gatehouse.session_token";

/// Claims carried by the session cookie
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Session token
    pub sid: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time, mirrors the session expiry
    pub exp: i64,
}

impl Claims {
    pub fn from_session(session: &Session) -> Self {
        Self {
            sub: session.user_id.clone(),
            sid: session.token.clone(),
            iat: session.created_at.timestamp(),
            exp: session.expires_at.timestamp(),
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp() > self.exp
    }
}

/// Sign a session into a cookie value
pub fn sign_session(session: &Session, secret: &str) -> Result<String> {
    let claims = Claims::from_session(session);
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| Error::InvalidToken(format!("Failed to sign session: {}", e)))
}

/// Verify a cookie value and decode its claims
pub fn verify_session(token: &str, secret: &str) -> Result<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| Error::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let session = Session::new("user-1".to_string(), 3600);
        let token = sign_session(&session, "secret").expect("Failed to sign");
        let claims = verify_session(&token, "secret").expect("Failed to verify");

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.sid, session.token);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let session = Session::new("user-1".to_string(), 3600);
        let token = sign_session(&session, "secret").unwrap();
        assert!(verify_session(&token, "other").is_err());
    }

    #[test]
    fn test_invalid_token() {
        assert!(verify_session("invalid.token.here", "secret").is_err());
    }

    #[test]
    fn test_expired_session_rejected() {
        let session = Session::new("user-1".to_string(), -3600);
        let token = sign_session(&session, "secret").unwrap();
        assert!(verify_session(&token, "secret").is_err());
    }
}
