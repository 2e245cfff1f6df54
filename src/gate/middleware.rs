//! Route gate: redirects requests that carry no session cookie

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use regex::Regex;
use std::sync::LazyLock;

use super::session_cookie;
use crate::context::AppContext;

/// Where requests without a session cookie are sent
pub const ROOT_PATH: &str = "/";

/// Paths the gate never checks: API routes, framework assets, favicon and
/// the auth pages themselves. Prefix match.
static EXCLUDED_PATHS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(api|_next/static|_next/image|favicon\.ico|sign-in|sign-up|assets)")
        .expect("Invalid regex pattern - this is a bug in the codebase")
});

/// Outcome of the gate for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(&'static str),
}

pub fn is_excluded_path(path: &str) -> bool {
    EXCLUDED_PATHS.is_match(path)
}

/// Decide whether a request may pass.
///
/// Only cookie presence is checked here; the session itself is validated
/// by the auth service when a page or API call needs it.
pub fn gate_request(has_database: bool, path: &str, has_session_cookie: bool) -> GateDecision {
    if !has_database || is_excluded_path(path) || has_session_cookie {
        return GateDecision::Allow;
    }

    // Redirecting the root to itself would loop; the layout guard handles it
    if path == ROOT_PATH {
        return GateDecision::Allow;
    }

    GateDecision::Redirect(ROOT_PATH)
}

/// Middleware for requiring a session cookie on page routes
pub async fn require_session_cookie(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Response {
    let has_cookie = session_cookie(req.headers()).is_some();

    match gate_request(ctx.has_database(), req.uri().path(), has_cookie) {
        GateDecision::Allow => next.run(req).await,
        GateDecision::Redirect(to) => {
            tracing::debug!("No session cookie for {}, redirecting to {}", req.uri().path(), to);
            Redirect::to(to).into_response()
        }
    }
}
