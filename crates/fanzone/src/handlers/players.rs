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
#[template(path = "players.html")]
struct PlayersTemplate {
    ctx: RequestContext,
    rows: Vec<Vec<Player>>,
    pager: Pager,
}

#[derive(Template)]
#[template(path = "playerinfo.html")]
struct PlayerInfoTemplate {
    ctx: RequestContext,
    player: Player,
    team: Option<Team>,
    news: Vec<News>,
    pager: Pager,
}

/// GET /players
pub async fn list_players(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), DEFAULT_PER_PAGE)?;
    let page = state
        .players
        .list_players(pagination)
        .await?
        .ensure_in_range()?;

    Ok(HtmlTemplate(PlayersTemplate {
        ctx,
        pager: Pager::new(&page, "/players"),
        rows: chunk_rows(&page.items, 3),
    }))
}

/// GET /playerinfo/{id} - profile plus related news.
pub async fn player_info(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let player = state
        .players
        .get_player(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Player", id))?;

    let team = match player.team_id {
        Some(team_id) => state.teams.get_team(team_id).await?,
        None => None,
    };

    let pagination = Pagination::from_query(query.page.as_deref(), DEFAULT_PER_PAGE)?;
    let news = state
        .news
        .news_for_player(player.id, pagination)
        .await?
        .ensure_in_range()?;

    Ok(HtmlTemplate(PlayerInfoTemplate {
        ctx,
        pager: Pager::new(&news, &format!("/playerinfo/{id}")),
        news: news.items,
        player,
        team,
    }))
}
