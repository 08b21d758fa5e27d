//! News list, detail, comments and likes.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use chrono::Utc;
use fanzone_auth::{redirect_with_flash, AuthRejection, FlashMessage};
use fanzone_core::domain::{
    validate_comment_body, AuthoredComment, News, NewComment, Permission, Player, Team,
};
use fanzone_core::pagination::{chunk_rows, Pagination, DEFAULT_PER_PAGE};
use fanzone_core::storage::RepositoryError;
use serde::Deserialize;

use crate::context::RequestContext;
use crate::handlers::error::AppError;
use crate::handlers::pages::HtmlTemplate;
use crate::handlers::views::{PageQuery, Pager};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "news.html")]
struct NewsListTemplate {
    ctx: RequestContext,
    rows: Vec<Vec<News>>,
    pager: Pager,
}

#[derive(Template)]
#[template(path = "news_detail.html")]
struct NewsDetailTemplate {
    ctx: RequestContext,
    news: News,
    players: Vec<Player>,
    teams: Vec<Team>,
    comments: Vec<AuthoredComment>,
    can_comment: bool,
    body: String,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub body: String,
}

fn detail_path(id: i64) -> String {
    format!("/news_detail/{id}")
}

/// GET /news - newest first, in rows of three.
pub async fn list_news(
    State(state): State<AppState>,
    ctx: RequestContext,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let pagination = Pagination::from_query(query.page.as_deref(), DEFAULT_PER_PAGE)?;
    let page = state.news.list_news(pagination).await?.ensure_in_range()?;

    Ok(HtmlTemplate(NewsListTemplate {
        ctx,
        pager: Pager::new(&page, "/news"),
        rows: chunk_rows(&page.items, 3),
    }))
}

async fn render_detail(
    state: &AppState,
    ctx: RequestContext,
    news: News,
    body: String,
    error: Option<String>,
) -> Result<HtmlTemplate<NewsDetailTemplate>, AppError> {
    let players = state.news.related_players(news.id).await?;
    let teams = state.news.related_teams(news.id).await?;
    let comments = state.comments.comments_for_news(news.id).await?;
    let can_comment = ctx.can(Permission::COMMENT);

    Ok(HtmlTemplate(NewsDetailTemplate {
        ctx,
        news,
        players,
        teams,
        comments,
        can_comment,
        body,
        error,
    }))
}

async fn find_news(state: &AppState, id: i64) -> Result<News, AppError> {
    state
        .news
        .get_news(id)
        .await?
        .ok_or_else(|| RepositoryError::not_found("News", id).into())
}

/// GET /news_detail/{id}
pub async fn news_detail(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let news = find_news(&state, id).await?;
    render_detail(&state, ctx, news, String::new(), None).await
}

/// POST /news_detail/{id} - add a comment.
pub async fn post_comment(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<i64>,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let Some(user) = ctx.user.clone().filter(|u| u.can(Permission::COMMENT)) else {
        return Ok(AuthRejection::Login {
            return_to: detail_path(id),
        }
        .into_response());
    };

    let news = find_news(&state, id).await?;

    if let Err(e) = validate_comment_body(&form.body) {
        let page = render_detail(&state, ctx, news, form.body, Some(e.to_string())).await?;
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    let comment = state
        .comments
        .create_comment(&NewComment {
            body: form.body,
            author_id: user.id,
            news_id: news.id,
            timestamp: Utc::now(),
        })
        .await?;
    tracing::info!(comment_id = comment.id, news_id = news.id, user_id = user.id, "Comment added");

    Ok(redirect_with_flash(
        &detail_path(news.id),
        FlashMessage::success("Your comment has been published."),
    ))
}

/// GET /like/{id} - one more heart.
pub async fn like(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Redirect, AppError> {
    match state.news.add_heart(id).await? {
        Some(hearts) => {
            tracing::debug!(news_id = id, hearts, "News liked");
            Ok(Redirect::to(&detail_path(id)))
        }
        None => Ok(Redirect::to("/")),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::{Duration, TimeZone};
    use fanzone_core::domain::{NewsDraft, PlayerDraft, TeamDraft};

    use crate::test_support::{body_text, location, TestApp};

    use super::*;

    async fn seed_news(app: &TestApp, count: i64) -> Vec<News> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut created = Vec::new();
        for i in 0..count {
            let draft = NewsDraft::new(format!("Headline {i}"), format!("Story {i}"))
                .at(base + Duration::hours(i));
            created.push(app.state.news.create_news(&draft).await.unwrap());
        }
        created
    }

    #[tokio::test]
    async fn test_news_list_first_page_shows_newest() {
        let app = TestApp::new().await;
        seed_news(&app, 14).await;

        let response = app.get("/news", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Headline 13"));
        assert!(html.contains("Headline 2"));
        assert!(!html.contains("Headline 1<"));
        assert!(html.contains("/news?page=2"));
    }

    #[tokio::test]
    async fn test_news_list_out_of_range_is_404() {
        let app = TestApp::new().await;
        seed_news(&app, 3).await;

        assert_eq!(app.get("/news?page=2", None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/news?page=0", None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/news?page=abc", None).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_empty_news_list_renders_first_page() {
        let app = TestApp::new().await;

        assert_eq!(app.get("/news", None).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_news_detail_shows_relations() {
        let app = TestApp::new().await;
        let team = app.state.teams.create_team(&TeamDraft::new("Warriors")).await.unwrap();
        let player = app
            .state
            .players
            .create_player(&PlayerDraft::new("Stephen Curry").on_team(team.id))
            .await
            .unwrap();
        let news = app
            .state
            .news
            .create_news(
                &NewsDraft::new("Curry hits 10 threes", "Splash")
                    .with_players([player.id])
                    .with_teams([team.id]),
            )
            .await
            .unwrap();

        let response = app.get(&format!("/news_detail/{}", news.id), None).await;

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Curry hits 10 threes"));
        assert!(html.contains(&format!("/playerinfo/{}", player.id)));
        assert!(html.contains(&format!("/teaminfo/{}", team.id)));
        assert!(!html.contains("name=\"body\""));
    }

    #[tokio::test]
    async fn test_news_detail_missing_or_invalid_id() {
        let app = TestApp::new().await;

        assert_eq!(app.get("/news_detail/42", None).await.status(), StatusCode::NOT_FOUND);
        assert_eq!(app.get("/news_detail/abc", None).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_anonymous_comment_redirects_to_login() {
        let app = TestApp::new().await;
        let news = seed_news(&app, 1).await.remove(0);

        let response = app
            .post_form(&format!("/news_detail/{}", news.id), "body=hi", None)
            .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            location(&response),
            format!("/auth/login?return_to=%2Fnews_detail%2F{}", news.id)
        );
    }

    #[tokio::test]
    async fn test_comment_is_published_and_listed() {
        let app = TestApp::new().await;
        let news = seed_news(&app, 1).await.remove(0);
        let user = app.user("fan@example.com", "fan").await;
        let cookie = app.login(&user).await;
        let path = format!("/news_detail/{}", news.id);

        let response = app
            .post_form(&path, "body=What+a+game%21", Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), path);

        let html = body_text(app.get(&path, Some(&cookie)).await).await;
        assert!(html.contains("What a game!"));
        assert!(html.contains("name=\"body\""));
    }

    #[tokio::test]
    async fn test_empty_comment_is_rejected() {
        let app = TestApp::new().await;
        let news = seed_news(&app, 1).await.remove(0);
        let user = app.user("fan@example.com", "fan").await;
        let cookie = app.login(&user).await;

        let response = app
            .post_form(&format!("/news_detail/{}", news.id), "body=+++", Some(&cookie))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(response).await.contains("Comment cannot be empty"));
        assert!(app
            .state
            .comments
            .comments_for_news(news.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_like_increments_and_redirects() {
        let app = TestApp::new().await;
        let news = seed_news(&app, 1).await.remove(0);

        let response = app.get(&format!("/like/{}", news.id), None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), format!("/news_detail/{}", news.id));
        assert_eq!(
            app.state.news.get_news(news.id).await.unwrap().unwrap().hearts,
            1
        );

        let response = app.get("/like/999", None).await;
        assert_eq!(location(&response), "/");
    }
}
