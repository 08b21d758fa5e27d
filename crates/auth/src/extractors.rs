//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use fanzone_core::auth::{is_session_expired, SessionId};
use fanzone_core::domain::User;

use crate::AuthState;

/// Why a request has no usable user.
#[derive(Debug)]
pub enum AuthRejection {
    /// Anonymous or expired; the browser is sent to the login form.
    Login { return_to: String },
    /// Session or user lookup failed.
    Unavailable,
}

impl AuthRejection {
    pub fn login_url(return_to: &str) -> String {
        format!("/auth/login?return_to={}", urlencoding::encode(return_to))
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Login { return_to } => {
                Redirect::to(&Self::login_url(&return_to)).into_response()
            }
            AuthRejection::Unavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "Session lookup failed").into_response()
            }
        }
    }
}

/// Resolves cookie -> session -> user and records the visit.
///
/// `Ok(None)` covers every anonymous case: no cookie, unknown or expired
/// session, deleted user.
async fn resolve_user(parts: &Parts, auth_state: &AuthState) -> Result<Option<User>, AuthRejection> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(cookie) = jar.get(&auth_state.config.cookie_name) else {
        return Ok(None);
    };
    let session_id = SessionId::new(cookie.value().to_string());

    let session = match auth_state.sessions.get_session(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return Ok(None),
        Err(e) => {
            tracing::error!(error = %e, "Session lookup failed");
            return Err(AuthRejection::Unavailable);
        }
    };

    let now = Utc::now();
    if is_session_expired(&session, now) {
        tracing::debug!(user_id = session.user_id, "Session expired");
        return Ok(None);
    }

    let user = match auth_state.users.get_user(session.user_id).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!(error = %e, user_id = session.user_id, "User lookup failed");
            return Err(AuthRejection::Unavailable);
        }
    };

    if let Some(user) = &user {
        if let Err(e) = auth_state.users.touch_last_seen(user.id, now).await {
            tracing::warn!(error = %e, user_id = user.id, "Failed to update last_seen");
        }
    }

    Ok(user)
}

fn requested_path(parts: &Parts) -> String {
    parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

/// Extractor for an authenticated user. Redirects to the login form otherwise.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);

        match resolve_user(parts, &auth_state).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => Err(AuthRejection::Login {
                return_to: requested_path(parts),
            }),
        }
    }
}

/// Extractor for an optionally authenticated user. Never rejects.
pub struct OptionalUser(pub Option<User>);

impl<S> FromRequestParts<S> for OptionalUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let user = resolve_user(parts, &auth_state).await.unwrap_or(None);
        Ok(OptionalUser(user))
    }
}
