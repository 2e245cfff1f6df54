//! Auth service: backed by a database or degraded to a no-op

use std::fmt;
use std::sync::Arc;

use crate::auth::models::{
    AuthOutcome, Session, SessionWithUser, SignInRequest, SignUpRequest, User, UserRecord,
};
use crate::auth::options::AuthOptions;
use crate::auth::{password, token};
use crate::database::AuthStore;
use crate::error::{Error, Result};

/// Why the service runs without a database
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradedReason {
    /// No connection string configured
    NotConfigured,
    /// The connect attempt failed
    ConnectionFailed,
    /// Connected, but the handle exposes no usable database
    MissingDatabase,
    /// Building the backed service failed
    ConstructionFailed(String),
}

impl fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradedReason::NotConfigured => write!(f, "no database configured"),
            DegradedReason::ConnectionFailed => write!(f, "database connection failed"),
            DegradedReason::MissingDatabase => write!(f, "database handle unavailable"),
            DegradedReason::ConstructionFailed(e) => write!(f, "auth setup failed: {}", e),
        }
    }
}

/// Auth service wired to a store
pub struct BackedAuth {
    options: AuthOptions,
    store: Arc<dyn AuthStore>,
}

impl BackedAuth {
    /// Prepare the store and build the service
    pub async fn new(options: AuthOptions, store: Arc<dyn AuthStore>) -> Result<Self> {
        store.migrate().await?;
        Ok(Self { options, store })
    }

    async fn sign_up(&self, req: SignUpRequest) -> Result<AuthOutcome> {
        let email_options = &self.options.email_and_password;
        if !email_options.enabled {
            return Err(Error::EmailPasswordDisabled);
        }
        if email_options.disable_sign_up {
            return Err(Error::SignUpDisabled);
        }

        let email = normalize_email(&req.email)?;
        self.check_password_length(&req.password)?;

        if self.store.find_user_by_email(&email).await?.is_some() {
            return Err(Error::UserAlreadyExists);
        }

        let name = req.name.trim().to_string();
        let user = User::new(name, email);

        let password_hash =
            password::hash_password_blocking(req.password, self.options.hash_params).await?;
        let record = UserRecord {
            user,
            password_hash,
        };
        self.store.insert_user(&record).await?;
        tracing::info!("Registered user {}", record.user.id);

        let session = if email_options.auto_sign_in {
            Some(self.create_session(&record.user).await?)
        } else {
            None
        };

        Ok(AuthOutcome {
            user: record.user,
            session,
        })
    }

    async fn sign_in(&self, req: SignInRequest) -> Result<AuthOutcome> {
        if !self.options.email_and_password.enabled {
            return Err(Error::EmailPasswordDisabled);
        }

        let email = normalize_email(&req.email).map_err(|_| Error::InvalidCredentials)?;
        let record = self
            .store
            .find_user_by_email(&email)
            .await?
            .ok_or(Error::InvalidCredentials)?;

        let matches =
            password::verify_password_blocking(req.password, record.password_hash.clone()).await?;
        if !matches {
            tracing::debug!("Password mismatch for user {}", record.user.id);
            return Err(Error::InvalidCredentials);
        }

        let session = self.create_session(&record.user).await?;
        Ok(AuthOutcome {
            user: record.user,
            session: Some(session),
        })
    }

    async fn get_session(&self, cookie: &str) -> Result<Option<SessionWithUser>> {
        let claims = match token::verify_session(cookie, &self.options.secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Rejected session cookie: {}", e);
                return Ok(None);
            }
        };

        let Some(session) = self.store.find_session(&claims.sid).await? else {
            return Ok(None);
        };
        if session.is_expired() || session.user_id != claims.sub {
            return Ok(None);
        }

        let user = self.store.find_user_by_id(&session.user_id).await?;
        Ok(user.map(|user| SessionWithUser { session, user }))
    }

    async fn sign_out(&self, cookie: &str) -> Result<()> {
        if let Ok(claims) = token::verify_session(cookie, &self.options.secret) {
            self.store.delete_session(&claims.sid).await?;
        }
        Ok(())
    }

    async fn create_session(&self, user: &User) -> Result<Session> {
        let session = Session::new(user.id.clone(), self.options.session_expires_in_secs);
        self.store.insert_session(&session).await?;
        Ok(session)
    }

    fn check_password_length(&self, password: &str) -> Result<()> {
        let options = &self.options.email_and_password;
        let len = password.chars().count();
        if len < options.min_password_length {
            return Err(Error::PasswordTooShort(options.min_password_length));
        }
        if len > options.max_password_length {
            return Err(Error::PasswordTooLong(options.max_password_length));
        }
        Ok(())
    }
}

/// Auth service with no storage behind it
pub struct DegradedAuth {
    options: AuthOptions,
    reason: DegradedReason,
}

impl DegradedAuth {
    pub fn new(options: AuthOptions, reason: DegradedReason) -> Self {
        Self { options, reason }
    }
}

/// Process-wide auth service
pub enum AuthService {
    Backed(BackedAuth),
    Degraded(DegradedAuth),
}

impl AuthService {
    pub fn is_backed(&self) -> bool {
        matches!(self, AuthService::Backed(_))
    }

    pub fn degraded_reason(&self) -> Option<&DegradedReason> {
        match self {
            AuthService::Backed(_) => None,
            AuthService::Degraded(degraded) => Some(&degraded.reason),
        }
    }

    pub fn options(&self) -> &AuthOptions {
        match self {
            AuthService::Backed(backed) => &backed.options,
            AuthService::Degraded(degraded) => &degraded.options,
        }
    }

    /// "backed" or "degraded"
    pub fn mode(&self) -> &'static str {
        if self.is_backed() {
            "backed"
        } else {
            "degraded"
        }
    }

    pub async fn sign_up_email(&self, req: SignUpRequest) -> Result<AuthOutcome> {
        match self {
            AuthService::Backed(backed) => backed.sign_up(req).await,
            AuthService::Degraded(_) => Err(Error::EmailPasswordDisabled),
        }
    }

    pub async fn sign_in_email(&self, req: SignInRequest) -> Result<AuthOutcome> {
        match self {
            AuthService::Backed(backed) => backed.sign_in(req).await,
            AuthService::Degraded(_) => Err(Error::EmailPasswordDisabled),
        }
    }

    /// Look up the session referenced by a cookie value.
    ///
    /// A missing, forged or expired cookie is `Ok(None)`. A degraded service
    /// has no session storage and fails.
    pub async fn get_session(&self, cookie: Option<&str>) -> Result<Option<SessionWithUser>> {
        match self {
            AuthService::Backed(backed) => match cookie {
                Some(cookie) => backed.get_session(cookie).await,
                None => Ok(None),
            },
            AuthService::Degraded(_) => Err(Error::SessionStorageDisabled),
        }
    }

    /// Revoke the session behind a cookie. No-op when degraded.
    pub async fn sign_out(&self, cookie: Option<&str>) -> Result<()> {
        match (self, cookie) {
            (AuthService::Backed(backed), Some(cookie)) => backed.sign_out(cookie).await,
            _ => Ok(()),
        }
    }

    /// Encode a session as a signed cookie value
    pub fn session_cookie_value(&self, session: &Session) -> Result<String> {
        token::sign_session(session, &self.options().secret)
    }
}

fn normalize_email(email: &str) -> Result<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(Error::InvalidEmail),
    }
}
