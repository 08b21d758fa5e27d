//! Axum extractor for RequestContext.

use std::convert::Infallible;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, HeaderMap},
};
use fanzone_auth::{AuthState, FlashMessage, OptionalUser};

use super::types::RequestContext;

fn is_secure(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}

impl<S> FromRequestParts<S> for RequestContext
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let OptionalUser(user) = OptionalUser::from_request_parts(parts, state)
            .await
            .unwrap_or(OptionalUser(None));

        Ok(RequestContext {
            user,
            flash: FlashMessage::from_headers(&parts.headers),
            secure: is_secure(&parts.headers),
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;
    use chrono::{Duration, Utc};
    use fanzone_auth::CurrentUser;
    use fanzone_core::auth::new_session;

    use super::*;
    use crate::test_support::TestApp;

    fn parts(uri: &str, cookie: Option<&str>) -> Parts {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }
        request.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_is_secure_from_forwarded_proto() {
        let mut headers = HeaderMap::new();
        assert!(!is_secure(&headers));

        headers.insert("x-forwarded-proto", "HTTPS".parse().unwrap());
        assert!(is_secure(&headers));

        headers.insert("x-forwarded-proto", "http".parse().unwrap());
        assert!(!is_secure(&headers));
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let app = TestApp::new().await;
        let fan = app.user("fan@example.com", "fan").await;
        let session = new_session(fan.id, Utc::now() - Duration::days(2), Duration::days(1));
        app.state.auth.sessions.create_session(&session).await.unwrap();
        let cookie = format!("{}={}", app.state.auth.config.cookie_name, session.id);

        let ctx = RequestContext::from_request_parts(&mut parts("/news", Some(&cookie)), &app.state)
            .await
            .unwrap();
        assert!(ctx.user.is_none());

        let result = CurrentUser::from_request_parts(&mut parts("/admin", Some(&cookie)), &app.state).await;
        let Err(rejection) = result else {
            panic!("expired session should not authenticate");
        };
        assert_eq!(rejection.into_response().status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_request_advances_last_seen() {
        let app = TestApp::new().await;
        let fan = app.user("fan@example.com", "fan").await;
        let earlier = Utc::now() - Duration::days(1);
        app.state.users.touch_last_seen(fan.id, earlier).await.unwrap();
        let cookie = app.login(&fan).await;

        let ctx = RequestContext::from_request_parts(&mut parts("/news", Some(&cookie)), &app.state)
            .await
            .unwrap();
        assert_eq!(ctx.user.map(|user| user.id), Some(fan.id));

        let fan = app.state.users.get_user(fan.id).await.unwrap().unwrap();
        assert!(fan.last_seen > earlier);
    }

    #[tokio::test]
    async fn test_current_user_redirects_to_login() {
        let app = TestApp::new().await;

        let result =
            CurrentUser::from_request_parts(&mut parts("/news_detail/3?page=2", None), &app.state).await;
        let Err(rejection) = result else {
            panic!("anonymous request should be rejected");
        };
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers()["location"],
            "/auth/login?return_to=%2Fnews_detail%2F3%3Fpage%3D2"
        );
    }

    #[tokio::test]
    async fn test_current_user_with_session() {
        let app = TestApp::new().await;
        let fan = app.user("fan@example.com", "fan").await;
        let cookie = app.login(&fan).await;

        let result = CurrentUser::from_request_parts(&mut parts("/news", Some(&cookie)), &app.state).await;
        let Ok(CurrentUser(user)) = result else {
            panic!("valid session should authenticate");
        };
        assert_eq!(user.username, "fan");
    }
}
