use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use fanzone_core::domain::{News, Player, Team};
use fanzone_core::pagination::{chunk_rows, Pagination, DEFAULT_PER_PAGE};
use fanzone_core::storage::RepositoryError;

use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "teams.html")]
struct TeamsTemplate {
    ctx: RequestContext,
    rows: Vec<Vec<Team>>,
    pager: Pager,
}

#[derive(Template)]
#[template(path = "teaminfo.html")]
struct TeamInfoTemplate {
    ctx: RequestContext,
    team: Team,
    roster: Vec<Player>,
    news: Vec<News>,
    pager: Pager,
}

/// GET /teams
pub async fn list_teams(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), DEFAULT_PER_PAGE)?;
    let page = state.teams.list_teams(pagination).await?.ensure_in_range()?;

    Ok(HtmlTemplate(TeamsTemplate {
        ctx,
        pager: Pager::new(&page, "/teams"),
        rows: chunk_rows(&page.items, 3),
    }))
}

/// GET /teaminfo/{id} - profile, roster and related news.
pub async fn team_info(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let team = state
        .teams
        .get_team(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Team", id))?;
    let roster = state.players.players_for_team(team.id).await?;

    let pagination = Pagination::from_query(query.page.as_deref(), DEFAULT_PER_PAGE)?;
    let news = state
        .news
        .news_for_team(team.id, pagination)
        .await?
        .ensure_in_range()?;

    Ok(HtmlTemplate(TeamInfoTemplate {
        ctx,
        pager: Pager::new(&news, &format!("/teaminfo/{id}")),
        news: news.items,
        team,
        roster,
    }))
}
