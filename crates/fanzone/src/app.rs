use axum::{
    extract::Request,
    http::{header::SET_COOKIE, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use axum_extra::extract::CookieJar;
use fanzone_auth::{
    auth_routes,
    flash::{clear_flash_header, FLASH_COOKIE},
};
use tower_http::{services::ServeDir, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers::{
        admin::admin_routes,
        auth_pages::{login_page, register_page, reset_page, reset_request_page},
        error::not_found,
        health::{livez, readyz},
        news::{like, list_news, news_detail, post_comment},
        pages::{about, index},
        players::{list_players, player_info},
        teams::{list_teams, team_info},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    // Page routes
    let pages = Router::new()
        .route("/", get(index))
        .route("/news", get(list_news))
        .route("/news_detail/{id}", get(news_detail).post(post_comment))
        .route("/like/{id}", get(like))
        .route("/players", get(list_players))
        .route("/playerinfo/{id}", get(player_info))
        .route("/teams", get(list_teams))
        .route("/teaminfo/{id}", get(team_info))
        .route("/aboutus", get(about));

    // Auth forms; the POST side lives in fanzone_auth
    let auth_pages = Router::new()
        .route("/auth/login", get(login_page))
        .route("/auth/register", get(register_page))
        .route("/auth/reset", get(reset_request_page))
        .route("/auth/reset/{token}", get(reset_page));

    Router::new()
        .merge(pages)
        .merge(auth_pages)
        .merge(auth_routes::<AppState>())
        .merge(admin_routes())
        .route("/livez", get(livez))
        .route("/readyz", get(readyz))
        .nest_service("/static", static_files)
        .fallback(not_found)
        .layer(middleware::from_fn(clear_shown_flash))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.config.request_timeout(),
        ))
        .with_state(state)
}

/// Expires the flash cookie once a page has displayed it.
///
/// Redirects keep the cookie so the message survives to the next page.
async fn clear_shown_flash(jar: CookieJar, request: Request, next: Next) -> Response {
    let had_flash = jar.get(FLASH_COOKIE).is_some();
    let mut response = next.run(request).await;

    let sets_flash = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .any(|value| value.as_bytes().starts_with(FLASH_COOKIE.as_bytes()));

    if had_flash && !response.status().is_redirection() && !sets_flash {
        if let Ok(value) = HeaderValue::from_str(&clear_flash_header()) {
            response.headers_mut().append(SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::test_support::{body_text, location, TestApp};

    #[tokio::test]
    async fn test_root_redirects_to_news() {
        let app = TestApp::new().await;

        let response = app.get("/", None).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/news");
    }

    #[tokio::test]
    async fn test_about_page() {
        let app = TestApp::new().await;

        let response = app.get("/aboutus", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("About"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404_page() {
        let app = TestApp::new().await;

        let response = app.get("/nope", None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("404"));
    }

    #[tokio::test]
    async fn test_invalid_path_id_is_400() {
        let app = TestApp::new().await;

        let response = app.get("/news_detail/abc", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_redirect_keeps_flash_cookie() {
        let app = TestApp::new().await;

        let response = app.get("/", Some("flash_message=x")).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn test_page_without_flash_sets_no_cookie() {
        let app = TestApp::new().await;

        let response = app.get("/aboutus", None).await;

        assert!(response.headers().get("set-cookie").is_none());
    }
}
