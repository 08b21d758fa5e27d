//! Forms for the auth POST actions served by `fanzone_auth::auth_routes`.

use askama::Template;
use axum::{
    extract::{Path, Query},
    response::IntoResponse,
};
use fanzone_core::auth::validate_return_to;
use serde::Deserialize;

use crate::context::RequestContext;
use crate::handlers::pages::HtmlTemplate;

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    pub return_to: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    ctx: RequestContext,
    return_to: Option<String>,
}

#[derive(Template)]
#[template(path = "auth/register.html")]
struct RegisterTemplate {
    ctx: RequestContext,
}

#[derive(Template)]
#[template(path = "auth/reset_request.html")]
struct ResetRequestTemplate {
    ctx: RequestContext,
}

#[derive(Template)]
#[template(path = "auth/reset.html")]
struct ResetTemplate {
    ctx: RequestContext,
    token: String,
}

/// GET /auth/login
pub async fn login_page(ctx: RequestContext, Query(query): Query<LoginQuery>) -> impl IntoResponse {
    let return_to = query
        .return_to
        .as_deref()
        .and_then(validate_return_to)
        .map(str::to_string);

    HtmlTemplate(LoginTemplate { ctx, return_to })
}

/// GET /auth/register
pub async fn register_page(ctx: RequestContext) -> impl IntoResponse {
    HtmlTemplate(RegisterTemplate { ctx })
}

/// GET /auth/reset
pub async fn reset_request_page(ctx: RequestContext) -> impl IntoResponse {
    HtmlTemplate(ResetRequestTemplate { ctx })
}

/// GET /auth/reset/{token}
pub async fn reset_page(ctx: RequestContext, Path(token): Path<String>) -> impl IntoResponse {
    HtmlTemplate(ResetTemplate { ctx, token })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{body_text, location, TestApp, PASSWORD};

    #[tokio::test]
    async fn test_login_page_keeps_local_return_to() {
        let app = TestApp::new().await;

        let html = body_text(app.get("/auth/login?return_to=%2Fadmin", None).await).await;
        assert!(html.contains("value=\"/admin\""));

        let html = body_text(
            app.get("/auth/login?return_to=https%3A%2F%2Fevil.example", None)
                .await,
        )
        .await;
        assert!(!html.contains("evil.example"));
    }

    #[tokio::test]
    async fn test_login_flow_sets_session_cookie() {
        let app = TestApp::new().await;
        app.user("fan@example.com", "fan").await;

        let response = app
            .post_form(
                "/auth/login",
                &format!("email=fan%40example.com&password={}&return_to=%2Fteams", PASSWORD.replace(' ', "+")),
                None,
            )
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/teams");
        let cookies: Vec<_> = response
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert!(cookies.iter().any(|c| c.starts_with("session=")));
    }

    async fn session_cookie_after_login(app: &TestApp, remember_me: bool) -> String {
        app.user("fan@example.com", "fan").await;
        let mut body = format!("email=fan%40example.com&password={}", PASSWORD.replace(' ', "+"));
        if remember_me {
            body.push_str("&remember_me=on");
        }

        let response = app.post_form("/auth/login", &body, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response
            .headers()
            .get_all("set-cookie")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .find(|c| c.starts_with("session="))
            .unwrap()
    }

    #[tokio::test]
    async fn test_remember_me_sets_persistent_cookie() {
        let app = TestApp::new().await;
        let cookie = session_cookie_after_login(&app, true).await;
        let ttl = app.state.auth.config.session_ttl.as_secs();
        assert!(cookie.contains(&format!("Max-Age={ttl}")));
    }

    #[tokio::test]
    async fn test_login_without_remember_me_sets_browser_session_cookie() {
        let app = TestApp::new().await;
        let cookie = session_cookie_after_login(&app, false).await;
        assert!(!cookie.contains("Max-Age"));
        assert!(!cookie.contains("Expires"));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn test_bad_login_redirects_back_with_flash() {
        let app = TestApp::new().await;
        app.user("fan@example.com", "fan").await;

        let response = app
            .post_form("/auth/login", "email=fan%40example.com&password=nope", None)
            .await;

        assert_eq!(location(&response), "/auth/login");
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("flash_message="));
    }

    #[tokio::test]
    async fn test_flash_is_shown_then_cleared() {
        let app = TestApp::new().await;
        let flash = fanzone_auth::FlashMessage::error("Invalid username or password.");
        let cookie = format!(
            "flash_message={}",
            urlencoding::encode(&flash.to_cookie_value())
        );

        let response = app.get("/auth/login", Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers()["set-cookie"].to_str().unwrap().to_string();
        assert!(cleared.contains("Max-Age=0"));
        assert!(body_text(response)
            .await
            .contains("Invalid username or password."));
    }

    #[tokio::test]
    async fn test_register_then_reset_password() {
        let app = TestApp::new().await;

        let response = app
            .post_form(
                "/auth/register",
                "email=new%40example.com&username=newfan&password=pw&password2=pw",
                None,
            )
            .await;
        assert_eq!(location(&response), "/auth/login");
        let user = app
            .state
            .users
            .get_user_by_email("new@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.role_name(), "User");

        let response = app
            .post_form("/auth/reset", "email=new%40example.com", None)
            .await;
        assert_eq!(location(&response), "/auth/login");
        let sent = app.outbox.sent();
        assert_eq!(sent.len(), 1);
        let link = sent[0].1.clone();

        let page = app.get(link.path(), None).await;
        assert_eq!(page.status(), StatusCode::OK);

        let response = app
            .post_form(
                link.path(),
                "email=new%40example.com&password=fresh&password2=fresh",
                None,
            )
            .await;
        assert_eq!(location(&response), "/auth/login");
        let user = app.state.users.get_user(user.id).await.unwrap().unwrap();
        assert!(fanzone_auth::password::verify_password("fresh", &user.password_hash));
    }

    #[tokio::test]
    async fn test_admin_email_registers_as_administrator() {
        let app = TestApp::new().await;

        app.post_form(
            "/auth/register",
            "email=Admin%40Example.com&username=boss&password=pw&password2=pw",
            None,
        )
        .await;

        let user = app
            .state
            .users
            .get_user_by_username("boss")
            .await
            .unwrap()
            .unwrap();
        assert!(user.is_administrator());
    }
}
