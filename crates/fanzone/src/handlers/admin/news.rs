use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use fanzone_auth::{redirect_with_flash, FlashMessage};
use fanzone_core::domain::{non_blank, News, NewsDraft};
use fanzone_core::pagination::{Pagination, ADMIN_PER_PAGE};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use super::{parse_optional_id, Admin, AdminForm, AdminList, AdminRow, FormField, SelectOption};
use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

const BASE: &str = "/admin/news";

/// Accepted layouts for the publication time field.
const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// News form; the relation selects submit one key per chosen option.
#[derive(Debug, Default, Deserialize)]
pub struct NewsForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    original_source: String,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    player_ids: Vec<String>,
    #[serde(default)]
    team_ids: Vec<String>,
}

fn parse_ids(values: &[String]) -> Vec<i64> {
    let mut ids: Vec<i64> = values
        .iter()
        .filter_map(|v| parse_optional_id(Some(v.as_str())))
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Parses the publication time. Blank means "not set".
fn parse_timestamp(value: &str) -> Result<Option<DateTime<Utc>>, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Some(naive.and_utc()))
        .ok_or_else(|| format!("Invalid publication time: {value}"))
}

impl NewsForm {
    fn from_news(news: &News, player_ids: Vec<i64>, team_ids: Vec<i64>) -> Self {
        Self {
            title: news.title.clone(),
            content: news.content.clone(),
            image: news.image.clone().unwrap_or_default(),
            original_source: news.original_source.clone().unwrap_or_default(),
            timestamp: news.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            player_ids: player_ids.iter().map(i64::to_string).collect(),
            team_ids: team_ids.iter().map(i64::to_string).collect(),
        }
    }

    fn to_draft(&self) -> Result<NewsDraft, String> {
        let draft = NewsDraft {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            image: non_blank(Some(self.image.clone())),
            original_source: non_blank(Some(self.original_source.clone())),
            timestamp: parse_timestamp(&self.timestamp)?,
            player_ids: parse_ids(&self.player_ids),
            team_ids: parse_ids(&self.team_ids),
        };
        draft.validate().map_err(|e| e.to_string())?;
        Ok(draft)
    }
}

/// Player and team options, with the form's current choices selected.
struct Relations {
    players: Vec<SelectOption>,
    teams: Vec<SelectOption>,
}

impl Relations {
    async fn load(state: &AppState, form: &NewsForm) -> Result<Self, AppError> {
        let player_ids = parse_ids(&form.player_ids);
        let team_ids = parse_ids(&form.team_ids);

        let players = state
            .players
            .all_players()
            .await?
            .into_iter()
            .map(|p| SelectOption::new(p.id, p.name, player_ids.contains(&p.id)))
            .collect();
        let teams = state
            .teams
            .all_teams()
            .await?
            .into_iter()
            .map(|t| SelectOption::new(t.id, t.name, team_ids.contains(&t.id)))
            .collect();

        Ok(Self { players, teams })
    }

    /// Names the first submitted id that matches no option.
    fn unknown_choice(&self, draft: &NewsDraft) -> Option<String> {
        let known = |options: &[SelectOption], id: i64| {
            options.iter().any(|o| o.value == id.to_string())
        };
        if let Some(id) = draft.player_ids.iter().find(|id| !known(&self.players, **id)) {
            return Some(format!("Unknown player: {id}"));
        }
        draft
            .team_ids
            .iter()
            .find(|id| !known(&self.teams, **id))
            .map(|id| format!("Unknown team: {id}"))
    }
}

fn form_page(
    ctx: RequestContext,
    title: &str,
    action: String,
    form: &NewsForm,
    relations: Relations,
) -> AdminForm {
    AdminForm {
        ctx,
        title: title.to_string(),
        action,
        back: BASE,
        fields: vec![
            FormField::text("title", "Title", &form.title).required(),
            FormField::textarea("content", "Content", &form.content).required(),
            FormField::text("image", "Image", &form.image),
            FormField::text("original_source", "Original source", &form.original_source),
            FormField::text("timestamp", "Published (UTC)", &form.timestamp),
            FormField::multi_select("player_ids", "Players", relations.players),
            FormField::multi_select("team_ids", "Teams", relations.teams),
        ],
        errors: Vec::new(),
    }
}

async fn find_news(state: &AppState, id: i64) -> Result<News, AppError> {
    state
        .news
        .get_news(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("News", id).into())
}

/// Validates a submitted form against the stored players and teams.
async fn checked_draft(
    state: &AppState,
    form: &NewsForm,
) -> Result<(Result<NewsDraft, String>, Relations), AppError> {
    let relations = Relations::load(state, form).await?;
    let draft = form.to_draft().and_then(|draft| match relations.unknown_choice(&draft) {
        Some(error) => Err(error),
        None => Ok(draft),
    });
    Ok((draft, relations))
}

pub async fn list(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), ADMIN_PER_PAGE)?;
    let page = state.news.list_news(pagination).await?.ensure_in_range()?;

    Ok(HtmlTemplate(AdminList {
        ctx,
        title: "News",
        base: BASE,
        headers: vec!["ID", "Title", "Published", "Hearts"],
        pager: Pager::new(&page, BASE),
        total: page.total,
        rows: page
            .items
            .into_iter()
            .map(|news| AdminRow {
                id: news.id,
                cells: vec![
                    news.id.to_string(),
                    news.title,
                    news.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    news.hearts.to_string(),
                ],
            })
            .collect(),
    }))
}

pub async fn new_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
) -> Result<impl IntoResponse, AppError> {
    let form = NewsForm::default();
    let relations = Relations::load(&state, &form).await?;
    Ok(HtmlTemplate(form_page(
        ctx,
        "New article",
        format!("{BASE}/new"),
        &form,
        relations,
    )))
}

pub async fn create(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    let (draft, relations) = checked_draft(&state, &form).await?;
    let draft = match draft {
        Ok(draft) => draft,
        Err(error) => {
            let page = form_page(ctx, "New article", format!("{BASE}/new"), &form, relations)
                .with_error(error);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
        }
    };

    let news = state.news.create_news(&draft).await?;
    tracing::info!(
        news_id = news.id,
        players = draft.player_ids.len(),
        teams = draft.team_ids.len(),
        "News created"
    );

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success("The article has been published."),
    ))
}

pub async fn edit_form(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let news = find_news(&state, id).await?;
    let player_ids = state
        .news
        .related_players(id)
        .await?
        .into_iter()
        .map(|p| p.id)
        .collect();
    let team_ids = state
        .news
        .related_teams(id)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();

    let form = NewsForm::from_news(&news, player_ids, team_ids);
    let relations = Relations::load(&state, &form).await?;
    Ok(HtmlTemplate(form_page(
        ctx,
        &format!("Edit {}", news.title),
        format!("{BASE}/{id}/edit"),
        &form,
        relations,
    )))
}

pub async fn update(
    State(state): State<AppState>,
    Admin(ctx): Admin,
    Path(id): Path<i64>,
    Form(form): Form<NewsForm>,
) -> Result<Response, AppError> {
    let news = find_news(&state, id).await?;
    let (draft, relations) = checked_draft(&state, &form).await?;
    let draft = match draft {
        Ok(draft) => draft,
        Err(error) => {
            let title = format!("Edit {}", news.title);
            let page = form_page(ctx, &title, format!("{BASE}/{id}/edit"), &form, relations)
                .with_error(error);
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, HtmlTemplate(page)).into_response());
        }
    };

    let news = state.news.update_news(id, &draft).await?;
    tracing::info!(news_id = news.id, "News updated");

    Ok(redirect_with_flash(
        BASE,
        FlashMessage::success("The article has been updated."),
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    Admin(_ctx): Admin,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    state.news.delete_news(id).await?;
    tracing::info!(news_id = id, "News deleted");

    Ok(redirect_with_flash(BASE, FlashMessage::info("Article deleted.")))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::TimeZone;
    use fanzone_core::domain::{NewsDraft, PlayerDraft, TeamDraft};
    use fanzone_core::pagination::Pagination;

    use super::*;
    use crate::test_support::{body_text, location, TestApp, ADMIN_EMAIL};

    async fn admin(app: &TestApp) -> String {
        let admin = app.user(ADMIN_EMAIL, "admin").await;
        app.login(&admin).await
    }

    #[test]
    fn test_parse_timestamp() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T18:30"), Ok(Some(expected)));
        assert_eq!(parse_timestamp("2024-03-01 18:30:00"), Ok(Some(expected)));
        assert_eq!(parse_timestamp("2024-03-01T18:30:00Z"), Ok(Some(expected)));
        assert_eq!(parse_timestamp("  "), Ok(None));
        assert!(parse_timestamp("yesterday").is_err());
    }

    #[test]
    fn test_parse_ids_skips_blanks_and_duplicates() {
        let values = vec!["3".to_string(), "".to_string(), "1".to_string(), "3".to_string()];
        assert_eq!(parse_ids(&values), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_create_news_with_relations() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;
        let team = app.state.teams.create_team(&TeamDraft::new("Bucks")).await.unwrap();
        let giannis = app
            .state
            .players
            .create_player(&PlayerDraft::new("Giannis"))
            .await
            .unwrap();
        let dame = app
            .state
            .players
            .create_player(&PlayerDraft::new("Damian Lillard"))
            .await
            .unwrap();

        let body = format!(
            "title=Bucks+win&content=Big+night&timestamp=2024-03-01T18%3A30&player_ids={}&player_ids={}&team_ids={}",
            giannis.id, dame.id, team.id
        );
        let response = app.post_form("/admin/news/new", &body, Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/admin/news");

        let page = app.state.news.list_news(Pagination::default()).await.unwrap();
        assert_eq!(page.total, 1);
        let news = &page.items[0];
        assert_eq!(news.title, "Bucks win");
        assert_eq!(
            news.timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap()
        );
        let players = app.state.news.related_players(news.id).await.unwrap();
        assert_eq!(players.len(), 2);
        let teams = app.state.news.related_teams(news.id).await.unwrap();
        assert_eq!(teams[0].id, team.id);
    }

    #[tokio::test]
    async fn test_create_news_rejects_unknown_player() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;

        let response = app
            .post_form(
                "/admin/news/new",
                "title=Rumour&content=Maybe&player_ids=77",
                Some(&cookie),
            )
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Unknown player: 77"));
    }

    #[tokio::test]
    async fn test_create_news_requires_content() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;

        let response = app
            .post_form("/admin/news/new", "title=Empty&content=", Some(&cookie))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(response).await;
        assert!(html.contains("Content is required"));
        assert!(html.contains("value=\"Empty\""));
    }

    #[tokio::test]
    async fn test_edit_form_selects_relations() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;
        let team = app.state.teams.create_team(&TeamDraft::new("Kings")).await.unwrap();
        let news = app
            .state
            .news
            .create_news(&NewsDraft::new("Kings trade", "Details").with_teams([team.id]))
            .await
            .unwrap();

        let response = app
            .get(&format!("/admin/news/{}/edit", news.id), Some(&cookie))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(&format!("value=\"{}\" selected", team.id)));
        assert!(html.contains("multiple"));
    }

    #[tokio::test]
    async fn test_update_replaces_relations_and_delete() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;
        let team = app.state.teams.create_team(&TeamDraft::new("Jazz")).await.unwrap();
        let news = app
            .state
            .news
            .create_news(&NewsDraft::new("Jazz news", "Body").with_teams([team.id]))
            .await
            .unwrap();

        let response = app
            .post_form(
                &format!("/admin/news/{}/edit", news.id),
                "title=Jazz+update&content=New+body",
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let updated = app.state.news.get_news(news.id).await.unwrap().unwrap();
        assert_eq!(updated.title, "Jazz update");
        assert_eq!(updated.timestamp, news.timestamp);
        assert!(app.state.news.related_teams(news.id).await.unwrap().is_empty());

        let response = app
            .post_form(&format!("/admin/news/{}/delete", news.id), "", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(app.state.news.get_news(news.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unchanged_edit_keeps_timestamp() {
        let app = TestApp::new().await;
        let cookie = admin(&app).await;
        let news = app
            .state
            .news
            .create_news(&NewsDraft::new("Jazz news", "Body"))
            .await
            .unwrap();
        let stored = app.state.news.get_news(news.id).await.unwrap().unwrap().timestamp;
        let prefilled = stored.to_rfc3339_opts(SecondsFormat::Micros, true);

        let uri = format!("/admin/news/{}/edit", news.id);
        let html = body_text(app.get(&uri, Some(&cookie)).await).await;
        assert!(html.contains(&prefilled));

        let response = app
            .post_form(
                &uri,
                &format!(
                    "title=Jazz+news&content=Body&timestamp={}",
                    urlencoding::encode(&prefilled)
                ),
                Some(&cookie),
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let updated = app.state.news.get_news(news.id).await.unwrap().unwrap();
        assert_eq!(updated.timestamp, stored);
    }
}
