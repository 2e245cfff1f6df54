//! API route handlers

use axum::{extract::State, response::IntoResponse, Json};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use super::cookies;
use crate::auth::{SessionWithUser, SignInRequest, SignUpRequest, User};
use crate::context::AppContext;
use crate::error::Result;
use crate::gate::jar_session_cookie;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    pub auth_mode: &'static str,
}

#[derive(Debug, Serialize)]
pub struct AuthPayload {
    pub user: User,
    pub signed_in: bool,
}

// Health check

pub async fn health(State(ctx): State<AppContext>) -> impl IntoResponse {
    let auth = ctx.auth_service().await;

    let database = if !ctx.connections.is_configured() {
        "not_configured"
    } else if ctx.connections.is_connected() {
        "connected"
    } else {
        "unavailable"
    };

    Json(ApiResponse::ok(HealthStatus {
        status: "healthy",
        database,
        auth_mode: auth.mode(),
    }))
}

// Auth routes

pub async fn sign_up_email(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse> {
    let auth = ctx.auth_service().await;
    let outcome = auth.sign_up_email(req).await?;

    let jar = match &outcome.session {
        Some(session) => jar.add(cookies::session_cookie(&auth, session)?),
        None => jar,
    };

    Ok((
        jar,
        Json(ApiResponse::ok(AuthPayload {
            signed_in: outcome.session.is_some(),
            user: outcome.user,
        })),
    ))
}

pub async fn sign_in_email(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse> {
    let auth = ctx.auth_service().await;
    let outcome = auth.sign_in_email(req).await?;

    let jar = match &outcome.session {
        Some(session) => jar.add(cookies::session_cookie(&auth, session)?),
        None => jar,
    };

    Ok((
        jar,
        Json(ApiResponse::ok(AuthPayload {
            signed_in: outcome.session.is_some(),
            user: outcome.user,
        })),
    ))
}

pub async fn sign_out(State(ctx): State<AppContext>, jar: CookieJar) -> Result<impl IntoResponse> {
    let auth = ctx.auth_service().await;
    auth.sign_out(jar_session_cookie(&jar).as_deref()).await?;

    Ok((
        jar.remove(cookies::cleared_session_cookie()),
        Json(ApiResponse::ok("signed_out")),
    ))
}

pub async fn get_session(State(ctx): State<AppContext>, jar: CookieJar) -> impl IntoResponse {
    let auth = ctx.auth_service().await;

    let cookie = jar_session_cookie(&jar);
    let session: Option<SessionWithUser> = match auth.get_session(cookie.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::debug!("Session lookup failed: {}", e);
            None
        }
    };

    Json(ApiResponse::ok(session))
}
