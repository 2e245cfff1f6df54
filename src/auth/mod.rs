//! Authentication and session management

pub mod models;
pub mod options;
pub mod password;
pub mod resolver;
pub mod service;
pub mod token;

pub use models::{Identity, Session, SessionWithUser, SignInRequest, SignUpRequest, User};
pub use options::{AuthOptions, EmailPasswordOptions};
pub use resolver::{resolve_auth_service, AuthResolver};
pub use service::{AuthService, BackedAuth, DegradedAuth, DegradedReason};
pub use token::{sign_session, verify_session, Claims, SESSION_COOKIE_NAME};
