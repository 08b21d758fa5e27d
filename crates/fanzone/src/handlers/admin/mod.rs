//! Administration views for users, teams, players and news.
//!
//! Every route requires a user holding `ADMINISTER`. Anonymous visitors are
//! sent to the login form; other users get a 403 page.

mod form;
mod news;
mod players;
mod teams;
mod users;

use askama::Template;
use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use fanzone_auth::{AuthRejection, AuthState};
use fanzone_core::pagination::Pagination;

use crate::context::RequestContext;
use crate::handlers::error::{error_page, AppError};
use crate::handlers::pages::HtmlTemplate;
use crate::state::AppState;

use form::{parse_optional_id, AdminForm, AdminList, AdminRow, FormField, SelectOption};

/// Extractor for an administrator's request context.
pub struct Admin(pub RequestContext);

impl<S> FromRequestParts<S> for Admin
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        match &ctx.user {
            None => Err(AuthRejection::Login {
                return_to: parts.uri.path().to_string(),
            }
            .into_response()),
            Some(user) if !user.is_administrator() => {
                tracing::warn!(user_id = user.id, path = %parts.uri.path(), "Admin access denied");
                Err(error_page(
                    StatusCode::FORBIDDEN,
                    ctx,
                    "You do not have permission to access this page.",
                ))
            }
            Some(_) => Ok(Admin(ctx)),
        }
    }
}

struct ModelCount {
    name: &'static str,
    path: &'static str,
    total: u64,
}

#[derive(Template)]
#[template(path = "admin/index.html")]
struct AdminIndexTemplate {
    ctx: RequestContext,
    models: Vec<ModelCount>,
}

/// GET /admin - one entry per model with its row count.
async fn index(State(state): State<AppState>, Admin(ctx): Admin) -> Result<impl IntoResponse, AppError> {
    let one_row = Pagination::new(1, 1)?;
    let models = vec![
        ModelCount {
            name: "Users",
            path: "/admin/users",
            total: state.users.list_users(one_row).await?.total,
        },
        ModelCount {
            name: "Teams",
            path: "/admin/teams",
            total: state.teams.list_teams(one_row).await?.total,
        },
        ModelCount {
            name: "Players",
            path: "/admin/players",
            total: state.players.list_players(one_row).await?.total,
        },
        ModelCount {
            name: "News",
            path: "/admin/news",
            total: state.news.list_news(one_row).await?.total,
        },
    ];

    Ok(HtmlTemplate(AdminIndexTemplate { ctx, models }))
}

/// Admin routes, mounted at the root router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/users", get(users::list))
        .route("/admin/users/new", get(users::new_form).post(users::create))
        .route("/admin/users/{id}/edit", get(users::edit_form).post(users::update))
        .route("/admin/users/{id}/delete", post(users::delete))
        .route("/admin/teams", get(teams::list))
        .route("/admin/teams/new", get(teams::new_form).post(teams::create))
        .route("/admin/teams/{id}/edit", get(teams::edit_form).post(teams::update))
        .route("/admin/teams/{id}/delete", post(teams::delete))
        .route("/admin/players", get(players::list))
        .route("/admin/players/new", get(players::new_form).post(players::create))
        .route("/admin/players/{id}/edit", get(players::edit_form).post(players::update))
        .route("/admin/players/{id}/delete", post(players::delete))
        .route("/admin/news", get(news::list))
        .route("/admin/news/new", get(news::new_form).post(news::create))
        .route("/admin/news/{id}/edit", get(news::edit_form).post(news::update))
        .route("/admin/news/{id}/delete", post(news::delete))
}
