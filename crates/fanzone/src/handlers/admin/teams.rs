use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Form,
};
use fanzone_auth::{redirect_with_flash, FlashMessage};
use fanzone_core::domain::{non_blank, Team, TeamDraft};
use fanzone_core::pagination::{Pagination, ADMIN_PER_PAGE};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use super::{Admin, AdminForm, AdminList, AdminRow, FormField};
use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

const BASE: &str = "/admin/teams";

#[derive(Debug, Default, Deserialize)]
pub struct TeamForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    introduction: String,
    #[serde(default)]
    image: String,
}

impl TeamForm {
    fn from_team(team: &Team) -> Self {
        Self {
            name: team.name.clone(),
            introduction: team.introduction.clone().unwrap_or_default(),
            image: team.image.clone().unwrap_or_default(),
        }
    }

    fn to_draft(&self) -> TeamDraft {
        TeamDraft {
            name: self.name.trim().to_string(),
            introduction: non_blank(Some(self.introduction.clone())),
            image: non_blank(Some(self.image.clone())),
        }
    }
}

fn form_page(ctx: RequestContext, title: &str, action: String, form: &TeamForm) -> AdminForm {
    AdminForm {
        ctx,
        title: title.to_string(),
        action,
        back: BASE,
        fields: vec![
            FormField::text("name", "Name", &form.name).required(),
            FormField::textarea("introduction", "Introduction", &form.introduction),
            FormField::text("image", "Image", &form.image),
        ],
        errors: Vec::new(),
    }
}

async fn find_team(state: &AppState, id: i64) -> Result<Team, AppError> {
    state
        .teams
        .get_team(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("Team", id).into())
}

pub async fn list(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), ADMIN_PER_PAGE)?;
    let page = state.teams.list_teams(pagination).await?.ensure_in_range()?;

    Ok(HtmlTemplate(AdminList {
        ctx,
        title: "Teams",
        base: BASE,
        headers: vec!["ID", "Name", "Image"],
        pager: Pager::new(&page, BASE),
        total: page.total,
        rows: page
            .items
            .into_iter()
            .map(|team| AdminRow {
                id: team.id,
                cells: vec![
                    team.id.to_string(),
                    team.name,
                    team.image.unwrap_or_default(),
                ],
            })
            .collect(),
    }))
}

pub async fn new_form(Admin(ctx): Admin) -> impl IntoResponse {
    HtmlTemplate(form_page(
        ctx,
        "New team",
        format!("{BASE}/new"),
        &TeamForm::default(),
    ))
}

pub async fn create(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Form(form): Form<TeamForm>,
) -> Result<Response, AppError> {
    let draft = form.to_draft();
    if let Err(e) = draft.validate() {
        let page = form_page(ctx, "New team", format!("{BASE}/new"), &form).with_error(e);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
    }

    let team = state.teams.create_team(&draft).await?;
    tracing::info!(team_id = team.id, name = %team.name, "Team created");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("Team {} created.", team.name)),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let team = find_team(&state, id).await?;

    Ok(HtmlTemplate(form_page(
        ctx,
        &format!("Edit {}", team.name),
        format!("{BASE}/{id}/edit"),
        &TeamForm::from_team(&team),
    )))
}

pub async fn update(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
    Form(form): Form<TeamForm>,
) -> Result<Response, AppError> {
    let team = find_team(&state, id).await?;
    let draft = form.to_draft();
    if let Err(e) = draft.validate() {
        let title = format!("Edit {}", team.name);
        let page = form_page(ctx, &title, format!("{BASE}/{id}/edit"), &form).with_error(e);
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
    }

    let team = state.teams.update_team(id, &draft).await?;
    tracing::info!(team_id = team.id, "Team updated");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success(format!("Team {} updated.", team.name)),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Admin(_ctx): Admin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.teams.delete_team(id).await?;
    tracing::info!(team_id = id, "Team deleted");

    Ok(redirect_with_flash(BASE, FlashMessage::info("Team deleted.")))
}
