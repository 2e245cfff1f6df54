//! Session cookie construction

use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::auth::{AuthService, Session, SESSION_COOKIE_NAME};
use crate::error::Result;

/// Cookie carrying a freshly issued session
pub fn session_cookie(auth: &AuthService, session: &Session) -> Result<Cookie<'static>> {
    let value = auth.session_cookie_value(session)?;
    let options = auth.options();

    Ok(Cookie::build((SESSION_COOKIE_NAME, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(options.secure_cookies())
        .max_age(time::Duration::seconds(options.session_expires_in_secs))
        .build())
}

/// Cookie that removes the session cookie from the browser
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(time::Duration::seconds(0))
        .build()
}
