use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use fanzone_auth::{redirect_with_flash, FlashMessage};
use fanzone_core::domain::{non_blank, Player, PlayerDraft};
use fanzone_core::pagination::{Pagination, ADMIN_PER_PAGE};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use super::{parse_optional_id, Admin, AdminForm, AdminList, AdminRow, FormField, SelectOption};
use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

const BASE: &str = "/admin/players";

#[derive(Debug, Default, Deserialize)]
pub struct PlayerForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    introduction: String,
    #[serde(default)]
    image: String,
}

impl PlayerForm {
    fn from_player(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            team_id: player.team_id.map(|id| id.to_string()),
            introduction: player.introduction.clone().unwrap_or_default(),
            image: player.image.clone().unwrap_or_default(),
        }
    }

    fn to_draft(&self) -> PlayerDraft {
        PlayerDraft {
            name: self.name.trim().to_string(),
            team_id: parse_optional_id(self.team_id.as_deref()),
            introduction: non_blank(Some(self.introduction.clone())),
            image: non_blank(Some(self.image.clone())),
        }
    }
}

async fn form_page(
    state: &AppState,
    ctx: RequestContext,
    title: &str,
    action: String,
    form: &PlayerForm,
) -> Result<AdminForm, AppError> {
    let selected = parse_optional_id(form.team_id.as_deref());
    let mut teams = vec![SelectOption::new("", "No team", selected.is_none())];
    teams.extend(
        state
            .teams
            .all_teams()
            .await?
            .into_iter()
            .map(|team| SelectOption::new(team.id, team.name, selected == Some(team.id))),
    );

    Ok(AdminForm {
        ctx,
        title: title.to_string(),
        action,
        back: BASE,
        fields: vec![
            FormField::text("name", "Name", &form.name).required(),
            FormField::select("team_id", "Team", teams),
            FormField::textarea("introduction", "Introduction", &form.introduction),
            FormField::text("image", "Image", &form.image),
        ],
        errors: Vec::new(),
    })
}

async fn find_player(state: &AppState, id: i64) -> Result<Player, AppError> {
    state
        .players
        .get_player(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Player", id).into())
}

/// Rejects a team id that does not exist.
async fn check_team(state: &AppState, draft: &PlayerDraft) -> Result<Option<String>, AppError> {
    match draft.team_id {
        Some(team_id) if state.teams.get_team(team_id).await?.is_none() => {
            Ok(Some("Unknown team".to_string()))
        }
        _ => Ok(None),
    }
}

async fn validate(state: &AppState, draft: &PlayerDraft) -> Result<Option<String>, AppError> {
    if let Err(e) = draft.validate() {
        return Ok(Some(e.to_string()));
    }
    check_team(state, draft).await
}

pub async fn list(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), ADMIN_PER_PAGE)?;
    let page = state
        .players
        .list_players(pagination)
        .await?
        .ensure_in_range()?;

    let mut rows = Vec::with_capacity(page.items.len());
    for player in &page.items {
        let team = match player.team_id {
            Some(team_id) => state.teams.get_team(team_id).await?.map(|t| t.name),
            None => None,
        };
        rows.push(AdminRow {
            id: player.id,
            cells: vec![
                player.id.to_string(),
                player.name.clone(),
                team.unwrap_or_else(|| "-".to_string()),
            ],
        });
    }

    Ok(HtmlTemplate(AdminList {
        ctx,
        title: "Players",
        base: BASE,
        headers: vec!["ID", "Name", "Team"],
        pager: Pager::new(&page, BASE),
        total: page.total,
        rows,
    }))
}

pub async fn new_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
) -> Result<impl IntoResponse, AppError> {
    let page = form_page(
        &state,
        ctx,
        "New player",
        format!("{BASE}/new"),
        &PlayerForm::default(),
    )
    .await?;
    Ok(HtmlTemplate(page))
}

pub async fn create(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Form(form): Form<PlayerForm>,
) -> Result<Response, AppError> {
    let draft = form.to_draft();
    if let Some(error) = validate(&state, &draft).await? {
        let page = form_page(&state, ctx, "New player", format!("{BASE}/new"), &form)
            .await?
            .with_error(error);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
    }

    let player = state.players.create_player(&draft).await?;
    tracing::info!(player_id = player.id, name = %player.name, "Player created");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("Player {} created.", player.name)),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let player = find_player(&state, id).await?;
    let page = form_page(
        &state,
        ctx,
        &format!("Edit {}", player.name),
        format!("{BASE}/{id}/edit"),
        &PlayerForm::from_player(&player),
    )
    .await?;
    Ok(HtmlTemplate(page))
}

pub async fn update(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
    Form(form): Form<PlayerForm>,
) -> Result<Response, AppError> {
    let player = find_player(&state, id).await?;
    let draft = form.to_draft();
    if let Some(error) = validate(&state, &draft).await? {
        let title = format!("Edit {}", player.name);
        let page = form_page(&state, ctx, &title, format!("{BASE}/{id}/edit"), &form)
            .await?
            .with_error(error);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
    }

    let player = state.players.update_player(id, &draft).await?;
    tracing::info!(player_id = player.id, "Player updated");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("Player {} updated.", player.name)),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Admin(_ctx): Admin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.players.delete_player(id).await?;
    tracing::info!(player_id = id, "Player deleted");

    Ok(redirect_with_flash(BASE, FlashMessage::info("Player deleted.")))
}
