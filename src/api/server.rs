//! HTTP server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::context::AppContext;
use crate::error::Result;
use crate::gate::require_session_cookie;
use crate::ui;

use super::routes;

/// Run the HTTP server
pub async fn run_server(ctx: AppContext, host: &str, port: u16) -> Result<()> {
    // Resolve auth up front so the mode shows in the startup logs
    let auth = ctx.auth_service().await;
    tracing::info!("Auth service mode: {}", auth.mode());

    let app = create_router(ctx);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // API routes
        .route("/api/health", get(routes::health))
        .route("/api/auth/sign-up/email", post(routes::sign_up_email))
        .route("/api/auth/sign-in/email", post(routes::sign_in_email))
        .route("/api/auth/sign-out", post(routes::sign_out))
        .route("/api/auth/get-session", get(routes::get_session))
        // Auth pages
        .route("/sign-in", get(ui::sign_in_page).post(ui::sign_in_submit))
        .route("/sign-up", get(ui::sign_up_page).post(ui::sign_up_submit))
        .route("/sign-out", post(ui::sign_out_submit))
        // Protected pages
        .route("/", get(ui::home))
        .route("/dashboard", get(ui::dashboard))
        .route("/assets/{*path}", get(ui::asset))
        .fallback(ui::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(
            ctx.clone(),
            require_session_cookie,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}
