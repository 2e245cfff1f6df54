//! Request gating: route middleware and page layout guard

pub mod layout;
pub mod middleware;

pub use layout::{guard_layout, LayoutOutcome, PageIdentity, SIGN_IN_PATH};
pub use middleware::{gate_request, is_excluded_path, require_session_cookie, GateDecision};

use axum::http::HeaderMap;
use axum_extra::extract::CookieJar;

use crate::auth::SESSION_COOKIE_NAME;

/// Session cookie value, if present and non-empty
pub fn session_cookie(headers: &HeaderMap) -> Option<String> {
    jar_session_cookie(&CookieJar::from_headers(headers))
}

/// Same as [`session_cookie`], for handlers that already hold a jar.
/// An empty value counts as no cookie.
pub fn jar_session_cookie(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .filter(|value| !value.is_empty())
}
