//! Layout guard: per-page session check and identity resolution

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use super::session_cookie;
use crate::auth::Identity;
use crate::context::AppContext;

pub const SIGN_IN_PATH: &str = "/sign-in";

/// What a page request turns into
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutOutcome {
    Redirect(&'static str),
    Render(Identity),
}

/// Resolve the identity a page renders with.
///
/// Session lookup failures are logged and count as "no session". With a
/// database configured a missing session redirects to sign-in; without one
/// the demo identity is used.
pub async fn guard_layout(ctx: &AppContext, cookie: Option<&str>) -> LayoutOutcome {
    let has_database = ctx.has_database();
    let auth = ctx.auth_service().await;

    let session = match auth.get_session(cookie).await {
        Ok(session) => session,
        Err(e) => {
            tracing::warn!("Auth session check failed (running without database): {}", e);
            None
        }
    };

    match session {
        Some(found) => LayoutOutcome::Render(Identity::from(&found.user)),
        None if has_database => LayoutOutcome::Redirect(SIGN_IN_PATH),
        None => LayoutOutcome::Render(Identity::demo()),
    }
}

/// Extractor for page handlers: the identity to render, or a redirect
#[derive(Debug, Clone)]
pub struct PageIdentity(pub Identity);

impl FromRequestParts<AppContext> for PageIdentity {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let cookie = session_cookie(&parts.headers);

        match guard_layout(state, cookie.as_deref()).await {
            LayoutOutcome::Render(identity) => Ok(PageIdentity(identity)),
            LayoutOutcome::Redirect(to) => Err(Redirect::to(to).into_response()),
        }
    }
}
