//! Web UI handlers

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use minijinja::context;
use rust_embed::RustEmbed;

use super::templates::render_page;
use crate::api::cookies;
use crate::auth::options::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::auth::{AuthService, Identity, SignInRequest, SignUpRequest};
use crate::context::AppContext;
use crate::error::{Error, Result};
use crate::gate::{jar_session_cookie, PageIdentity};

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Assets;

fn is_demo(identity: &Identity) -> bool {
    *identity == Identity::demo()
}

/// Home page
pub async fn home(PageIdentity(user): PageIdentity) -> Result<Html<String>> {
    let demo = is_demo(&user);
    Ok(Html(render_page("home.html", context! { user, demo })?))
}

/// Dashboard page - identity and backend status
pub async fn dashboard(
    State(ctx): State<AppContext>,
    PageIdentity(user): PageIdentity,
) -> Result<Html<String>> {
    let auth = ctx.auth_service().await;
    let demo = is_demo(&user);
    let database = if ctx.connections.is_connected() {
        "connected"
    } else if ctx.has_database() {
        "unavailable"
    } else {
        "not configured"
    };

    Ok(Html(render_page(
        "dashboard.html",
        context! { user, demo, database, auth_mode => auth.mode() },
    )?))
}

/// Values echoed back into a form after a failed submit
#[derive(Debug, Default)]
struct FormEcho {
    name: String,
    email: String,
}

#[derive(Clone, Copy)]
enum AuthForm {
    SignIn,
    SignUp,
}

fn render_auth_form(
    form: AuthForm,
    auth: &AuthService,
    echo: FormEcho,
    error: Option<String>,
) -> Result<Html<String>> {
    let (heading, action, with_name, alternate) = match form {
        AuthForm::SignIn => (
            "Sign in",
            "/sign-in",
            false,
            r#"No account yet? <a href="/sign-up">Sign up</a>"#,
        ),
        AuthForm::SignUp => (
            "Sign up",
            "/sign-up",
            true,
            r#"Already registered? <a href="/sign-in">Sign in</a>"#,
        ),
    };

    Ok(Html(render_page(
        "auth_form.html",
        context! {
            heading,
            action,
            with_name,
            alternate,
            error,
            name => echo.name,
            email => echo.email,
            enabled => auth.options().email_and_password.enabled,
            min_password => MIN_PASSWORD_LENGTH,
            max_password => MAX_PASSWORD_LENGTH,
        },
    )?))
}

/// Re-render a form with the error; internal failures get a generic message
fn form_error(form: AuthForm, auth: &AuthService, echo: FormEcho, err: Error) -> Response {
    let status = err.status_code();
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Auth form submit failed: {}", err);
        "Something went wrong, please try again".to_string()
    } else {
        err.to_string()
    };

    match render_auth_form(form, auth, echo, Some(message)) {
        Ok(page) => (status, page).into_response(),
        Err(e) => e.into_response(),
    }
}

/// GET /sign-in
pub async fn sign_in_page(State(ctx): State<AppContext>) -> Result<Html<String>> {
    let auth = ctx.auth_service().await;
    render_auth_form(AuthForm::SignIn, &auth, FormEcho::default(), None)
}

/// GET /sign-up
pub async fn sign_up_page(State(ctx): State<AppContext>) -> Result<Html<String>> {
    let auth = ctx.auth_service().await;
    render_auth_form(AuthForm::SignUp, &auth, FormEcho::default(), None)
}

/// POST /sign-in - form login
pub async fn sign_in_submit(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Form(req): Form<SignInRequest>,
) -> Response {
    let auth = ctx.auth_service().await;
    let echo = FormEcho {
        name: String::new(),
        email: req.email.clone(),
    };

    let signed_in = auth.sign_in_email(req).await.and_then(|outcome| match outcome.session {
        Some(session) => cookies::session_cookie(&auth, &session),
        None => Err(Error::SessionStorageDisabled),
    });

    match signed_in {
        Ok(cookie) => (jar.add(cookie), Redirect::to("/")).into_response(),
        Err(e) => form_error(AuthForm::SignIn, &auth, echo, e),
    }
}

/// POST /sign-up - form registration
pub async fn sign_up_submit(
    State(ctx): State<AppContext>,
    jar: CookieJar,
    Form(req): Form<SignUpRequest>,
) -> Response {
    let auth = ctx.auth_service().await;
    let echo = FormEcho {
        name: req.name.clone(),
        email: req.email.clone(),
    };

    let registered = auth.sign_up_email(req).await.and_then(|outcome| {
        outcome
            .session
            .map(|session| cookies::session_cookie(&auth, &session))
            .transpose()
    });

    match registered {
        Ok(Some(cookie)) => (jar.add(cookie), Redirect::to("/")).into_response(),
        // Registered without auto sign-in
        Ok(None) => Redirect::to("/sign-in").into_response(),
        Err(e) => form_error(AuthForm::SignUp, &auth, echo, e),
    }
}

/// POST /sign-out
pub async fn sign_out_submit(State(ctx): State<AppContext>, jar: CookieJar) -> Response {
    let auth = ctx.auth_service().await;
    let cookie = jar_session_cookie(&jar);

    if let Err(e) = auth.sign_out(cookie.as_deref()).await {
        tracing::warn!("Failed to revoke session on sign out: {}", e);
    }

    (
        jar.remove(cookies::cleared_session_cookie()),
        Redirect::to("/sign-in"),
    )
        .into_response()
}

/// Embedded static assets
pub async fn asset(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(file) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.data.into_owned(),
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Fallback page
pub async fn not_found() -> Response {
    match render_page("not_found.html", context! {}) {
        Ok(page) => (StatusCode::NOT_FOUND, Html(page)).into_response(),
        Err(e) => e.into_response(),
    }
}
