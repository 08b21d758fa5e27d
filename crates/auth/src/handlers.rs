//! HTTP handlers for auth routes.
//!
//! Only the POST actions live here; the forms they receive are rendered by
//! the server with its own layout.

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;
use chrono::{Duration, Utc};
use fanzone_core::auth::{new_session, validate_return_to, Session, SessionId};
use fanzone_core::domain::{
    assign_role, avatar_hash, normalize_email, validate_password_pair, NewUser, Registration,
};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use crate::error::AuthError;
use crate::flash::{redirect_with_flash, FlashMessage};
use crate::password::{hash_password_blocking, verify_password};
use crate::reset::{generate_reset_token, reset_password};
use crate::AuthState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Checkbox; present when ticked.
    pub remember_me: Option<String>,
    pub return_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetRequestForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetForm {
    pub email: String,
    pub password: String,
    pub password2: String,
}

/// Creates the auth router.
///
/// Routes:
/// - `POST /auth/login` - Check credentials and start a session
/// - `POST /auth/logout` - End the current session
/// - `POST /auth/register` - Create an account
/// - `POST /auth/reset` - Send a reset link
/// - `POST /auth/reset/{token}` - Choose a new password
pub fn auth_routes<S>() -> Router<S>
where
    AuthState: FromRef<S>,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/register", post(register))
        .route("/auth/reset", post(request_reset))
        .route("/auth/reset/{token}", post(reset))
}

/// Session cookie; persistent only when the user asked to be remembered.
pub fn session_cookie(state: &AuthState, session: &Session, remember: bool) -> Cookie<'static> {
    let mut cookie = Cookie::build((
        state.config.cookie_name.clone(),
        session.id.as_str().to_string(),
    ))
    .path("/")
    .http_only(true)
    .secure(state.config.cookie_secure)
    .same_site(SameSite::Lax);

    if remember {
        cookie = cookie.max_age(time::Duration::seconds(
            state.config.session_ttl.as_secs() as i64,
        ));
    }

    cookie.build()
}

fn login_page(return_to: Option<&str>) -> String {
    match return_to {
        Some(path) => format!("/auth/login?return_to={}", urlencoding::encode(path)),
        None => "/auth/login".to_string(),
    }
}

async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AuthError> {
    let return_to = form.return_to.as_deref().and_then(validate_return_to);

    let user = state
        .users
        .get_user_by_email(&normalize_email(&form.email))
        .await?;

    let Some(user) = user.filter(|u| verify_password(&form.password, &u.password_hash)) else {
        tracing::info!(email = %form.email, "Rejected login");
        return Ok(redirect_with_flash(
            &login_page(return_to),
            FlashMessage::error("Invalid username or password."),
        ));
    };

    let ttl = Duration::seconds(state.config.session_ttl.as_secs() as i64);
    let session = new_session(user.id, Utc::now(), ttl);
    state.sessions.create_session(&session).await?;

    let remember = form.remember_me.is_some();
    tracing::info!(user_id = user.id, remember, "User logged in");

    let jar = jar.add(session_cookie(&state, &session, remember));
    Ok((jar, Redirect::to(return_to.unwrap_or("/"))).into_response())
}

async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response, AuthError> {
    if let Some(cookie) = jar.get(&state.config.cookie_name) {
        let session_id = SessionId::new(cookie.value().to_string());
        state.sessions.delete_session(&session_id).await?;
    }

    let jar = jar.remove(Cookie::build(state.config.cookie_name.clone()).path("/"));
    Ok((
        jar,
        redirect_with_flash("/", FlashMessage::info("You have been logged out.")),
    )
        .into_response())
}

async fn register(
    State(state): State<AuthState>,
    Form(form): Form<Registration>,
) -> Result<Response, AuthError> {
    if let Err(e) = form.validate() {
        return Ok(redirect_with_flash(
            "/auth/register",
            FlashMessage::error(e.to_string()),
        ));
    }

    let email = normalize_email(&form.email);
    let username = form.username.trim().to_string();

    if state.users.get_user_by_email(&email).await?.is_some() {
        return Ok(redirect_with_flash(
            "/auth/register",
            FlashMessage::error("Email already registered."),
        ));
    }
    if state.users.get_user_by_username(&username).await?.is_some() {
        return Ok(redirect_with_flash(
            "/auth/register",
            FlashMessage::error("Username already in use."),
        ));
    }

    let roles = state.roles.list_roles().await?;
    let role_id = assign_role(&email, state.config.admin_email.as_deref(), &roles).map(|r| r.id);

    let new_user = NewUser {
        avatar_hash: Some(avatar_hash(&email)),
        email,
        username,
        password_hash: hash_password_blocking(form.password.clone()).await?,
        role_id,
        member_since: Utc::now(),
    };

    match state.users.create_user(&new_user).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username = %user.username, "User registered");
            Ok(redirect_with_flash(
                "/auth/login",
                FlashMessage::success("You can now login."),
            ))
        }
        Err(RepositoryError::AlreadyExists { .. }) => Ok(redirect_with_flash(
            "/auth/register",
            FlashMessage::error("Email or username already in use."),
        )),
        Err(e) => Err(e.into()),
    }
}

async fn request_reset(
    State(state): State<AuthState>,
    Form(form): Form<ResetRequestForm>,
) -> Result<Response, AuthError> {
    let email = normalize_email(&form.email);

    if let Some(user) = state.users.get_user_by_email(&email).await? {
        let token = generate_reset_token(
            user.id,
            &state.config.secret_key,
            state.config.reset_token_ttl,
            Utc::now(),
        )?;
        let link = state.config.reset_link(&token)?;
        state.notifier.send_reset_link(&user, &link).await?;
    } else {
        tracing::debug!(email = %email, "Reset requested for unknown email");
    }

    Ok(redirect_with_flash(
        "/auth/login",
        FlashMessage::info("An email with instructions to reset your password has been sent to you."),
    ))
}

async fn reset(
    State(state): State<AuthState>,
    Path(token): Path<String>,
    Form(form): Form<ResetForm>,
) -> Result<Response, AuthError> {
    if let Err(e) = validate_password_pair(&form.password, &form.password2) {
        return Ok(redirect_with_flash(
            &format!("/auth/reset/{}", urlencoding::encode(&token)),
            FlashMessage::error(e.to_string()),
        ));
    }

    let Some(user) = state
        .users
        .get_user_by_email(&normalize_email(&form.email))
        .await?
    else {
        return Ok(Redirect::to("/").into_response());
    };

    match reset_password(
        state.users.as_ref(),
        &user,
        &token,
        &state.config.secret_key,
        &form.password,
    )
    .await
    {
        Ok(()) => {
            state.sessions.delete_user_sessions(user.id).await?;
            Ok(redirect_with_flash(
                "/auth/login",
                FlashMessage::success("Your password has been updated."),
            ))
        }
        Err(AuthError::InvalidToken) => Ok(Redirect::to("/").into_response()),
        Err(e) => Err(e),
    }
}
