//! Authentication models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user
    pub fn new(name: String, email: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            email,
            email_verified: false,
            created_at: Utc::now(),
        }
    }
}

/// A user together with its password hash, as persisted
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Server-side session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque session token (referenced by the cookie)
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for a user, valid for `ttl_secs`
    pub fn new(user_id: String, ttl_secs: i64) -> Self {
        let now = Utc::now();
        Self {
            token: uuid::Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at: now + chrono::Duration::seconds(ttl_secs),
            created_at: now,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Result of a session lookup
#[derive(Debug, Clone, Serialize)]
pub struct SessionWithUser {
    pub session: Session,
    pub user: User,
}

/// Identity handed to rendered pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl Identity {
    /// Placeholder identity used when running without a database
    pub fn demo() -> Self {
        Self {
            id: "demo-user".to_string(),
            name: "Demo User".to_string(),
            email: "demo@example.com".to_string(),
        }
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Email sign-up payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Email sign-in payload
#[derive(Debug, Clone, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Outcome of a successful sign-up or sign-in.
///
/// `session` is `None` after a sign-up when auto sign-in is off.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub user: User,
    pub session: Option<Session>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_identity() {
        let identity = Identity::demo();
        assert_eq!(identity.id, "demo-user");
        assert_eq!(identity.name, "Demo User");
        assert_eq!(identity.email, "demo@example.com");
    }

    #[test]
    fn test_identity_from_user() {
        let user = User::new("Alice".to_string(), "alice@example.com".to_string());
        let identity = Identity::from(&user);
        assert_eq!(identity.id, user.id);
        assert_eq!(identity.email, "alice@example.com");
    }

    #[test]
    fn test_session_expiry() {
        let session = Session::new("u1".to_string(), 60);
        assert!(!session.is_expired());

        let expired = Session::new("u1".to_string(), -1);
        assert!(expired.is_expired());
    }

    #[test]
    fn test_session_tokens_are_unique() {
        let a = Session::new("u1".to_string(), 60);
        let b = Session::new("u1".to_string(), 60);
        assert_ne!(a.token, b.token);
    }
}
