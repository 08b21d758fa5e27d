//! Shared fixtures for router and handler tests.

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

use fanzone_auth::{password::hash_password, AuthConfig, AuthState, MemorySessionStore, OutboxNotifier};
use fanzone_core::auth::new_session;
use fanzone_core::domain::{assign_role, avatar_hash, NewUser, User};

use crate::app::create_app;
use crate::config::Config;
use crate::seed::insert_roles;
use crate::state::AppState;
use crate::storage::sqlite::SqliteRepository;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub state: AppState,
    pub outbox: Arc<OutboxNotifier>,
}

impl TestApp {
    /// In-memory database with the standard roles and a memory session store.
    pub async fn new() -> Self {
        let repo = Arc::new(SqliteRepository::new_in_memory().await.unwrap());
        insert_roles(repo.as_ref()).await.unwrap();

        let outbox = Arc::new(OutboxNotifier::new());
        let auth_config = AuthConfig::new(
            "test-secret",
            Url::parse("http://localhost:3000").unwrap(),
        )
        .with_admin_email(ADMIN_EMAIL);
        let auth = AuthState::new(
            Arc::new(MemorySessionStore::new()),
            repo.clone(),
            repo.clone(),
            outbox.clone(),
            auth_config,
        );
        let config = Config {
            sqlite_path: ":memory:".to_string(),
            session_db_path: ":memory:".to_string(),
            static_dir: "static".to_string(),
            request_timeout_seconds: 10,
        };

        Self {
            state: AppState::new(repo, auth, config),
            outbox,
        }
    }

    pub fn router(&self) -> Router {
        create_app(self.state.clone())
    }

    /// Creates a user with the default (or admin) role.
    pub async fn user(&self, email: &str, username: &str) -> User {
        let roles = self.state.roles.list_roles().await.unwrap();
        let role_id = assign_role(email, Some(ADMIN_EMAIL), &roles)
            .map(|role| role.id);

        self.state
            .users
            .create_user(&NewUser {
                email: email.to_string(),
                username: username.to_string(),
                password_hash: hash_password(PASSWORD).unwrap(),
                role_id,
                avatar_hash: Some(avatar_hash(email)),
                member_since: Utc::now(),
            })
            .await
            .unwrap()
    }

    /// Starts a session for `user` and returns the `Cookie` header value.
    pub async fn login(&self, user: &User) -> String {
        let session = new_session(user.id, Utc::now(), Duration::days(1));
        self.state
            .auth
            .sessions
            .create_session(&session)
            .await
            .unwrap();
        format!("{}={}", self.state.auth.config.cookie_name, session.id)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }
        self.router()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header("cookie", cookie);
        }
        self.router()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_text(response: Response) -> String {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(body.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response.headers()["location"].to_str().unwrap()
}
