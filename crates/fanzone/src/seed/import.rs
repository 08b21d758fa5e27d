//! `fanzone import`: load the JSON fixtures into the database.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use fanzone_auth::password::hash_password_blocking;
use fanzone_core::domain::{
    assign_role, avatar_hash, normalize_email, validate_comment_body, NewComment, NewUser,
    NewsDraft, PlayerDraft, TeamDraft,
};
use fanzone_core::seed::{
    parse_comments, parse_news, parse_players, parse_teams, parse_users, PhaseCount, SeedSummary,
    COMMENTS_FILE, NEWS_FILE, PLAYERS_FILE, TEAMS_FILE, USERS_FILE,
};
use fanzone_core::storage::{
    CommentRepository, NewsRepository, PlayerRepository, RepositoryError, RoleRepository,
    TeamRepository, UserRepository,
};

use super::deploy::insert_roles;

/// The repositories an import writes to.
pub struct Repositories<'a> {
    pub roles: &'a dyn RoleRepository,
    pub users: &'a dyn UserRepository,
    pub teams: &'a dyn TeamRepository,
    pub players: &'a dyn PlayerRepository,
    pub news: &'a dyn NewsRepository,
    pub comments: &'a dyn CommentRepository,
}

impl<'a> Repositories<'a> {
    /// Uses one backend for every repository.
    pub fn new<R>(repo: &'a R) -> Self
    where
        R: RoleRepository
            + UserRepository
            + TeamRepository
            + PlayerRepository
            + NewsRepository
            + CommentRepository,
    {
        Self {
            roles: repo,
            users: repo,
            teams: repo,
            players: repo,
            news: repo,
            comments: repo,
        }
    }
}

/// Reads a fixture file; a missing file yields `None`.
async fn read_fixture(dir: &Path, file: &'static str) -> anyhow::Result<Option<String>> {
    let path = dir.join(file);
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Fixture file missing, skipping phase");
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
    }
}

/// Runs a full import from the fixture directory.
///
/// Phases run in dependency order: roles, teams (with their members),
/// players, news, users, comments. Records that cannot be stored are logged
/// and counted as skipped; dangling links on stored records count as unlinked.
pub async fn import_dir(
    repos: &Repositories<'_>,
    dir: &Path,
    admin_email: Option<&str>,
) -> anyhow::Result<SeedSummary> {
    insert_roles(repos.roles).await?;

    let mut summary = SeedSummary::default();

    if let Some(json) = read_fixture(dir, TEAMS_FILE).await? {
        import_teams(repos, &json, &mut summary).await?;
    }
    if let Some(json) = read_fixture(dir, PLAYERS_FILE).await? {
        summary.players = sum(summary.players, import_players(repos, &json).await?);
    }

    let mut news_ids = HashMap::new();
    if let Some(json) = read_fixture(dir, NEWS_FILE).await? {
        summary.news = import_news(repos, &json, &mut news_ids).await?;
    }

    let mut user_ids = HashMap::new();
    if let Some(json) = read_fixture(dir, USERS_FILE).await? {
        summary.users = import_users(repos, &json, admin_email, &mut user_ids).await?;
    }
    if let Some(json) = read_fixture(dir, COMMENTS_FILE).await? {
        summary.comments = import_comments(repos, &json, &user_ids, &news_ids).await?;
    }

    tracing::info!(skipped = summary.total_skipped(), "Import finished");
    Ok(summary)
}

fn sum(a: PhaseCount, b: PhaseCount) -> PhaseCount {
    PhaseCount {
        inserted: a.inserted + b.inserted,
        skipped: a.skipped + b.skipped,
        unlinked: a.unlinked + b.unlinked,
    }
}

async fn import_teams(
    repos: &Repositories<'_>,
    json: &str,
    summary: &mut SeedSummary,
) -> anyhow::Result<()> {
    for record in parse_teams(json)? {
        if record.name.trim().is_empty() {
            tracing::warn!("Team without a name, skipping");
            summary.teams.skipped += 1;
            continue;
        }

        let team = match repos.teams.get_team_by_name(&record.name).await? {
            Some(team) => {
                tracing::debug!(team = %team.name, "Team already present");
                summary.teams.skipped += 1;
                team
            }
            None => {
                let mut draft = TeamDraft::new(record.name.trim());
                draft.introduction = record.introduction.clone();
                draft.image = record.logo.clone();
                summary.teams.inserted += 1;
                repos.teams.create_team(&draft).await?
            }
        };

        for member in record.members() {
            if repos.players.get_player_by_name(member).await?.is_some() {
                summary.players.skipped += 1;
                continue;
            }
            repos
                .players
                .create_player(&PlayerDraft::new(member).on_team(team.id))
                .await?;
            summary.players.inserted += 1;
        }
    }
    Ok(())
}

/// Fills in player profiles; counts applied updates as inserted.
async fn import_players(repos: &Repositories<'_>, json: &str) -> anyhow::Result<PhaseCount> {
    let mut count = PhaseCount::default();

    for record in parse_players(json)? {
        let Some(player) = repos.players.get_player_by_name(&record.name).await? else {
            tracing::warn!(player = %record.name, "Unknown player, skipping profile");
            count.skipped += 1;
            continue;
        };

        let mut team_id = player.team_id;
        if team_id.is_none() {
            if let Some(team_name) = record.team_name.as_deref() {
                team_id = repos.teams.get_team_by_name(team_name).await?.map(|t| t.id);
                if team_id.is_none() {
                    tracing::warn!(player = %player.name, team = %team_name, "Unknown team");
                    count.unlinked += 1;
                }
            }
        }

        let draft = PlayerDraft {
            name: player.name.clone(),
            team_id,
            introduction: record.introduction.clone().or(player.introduction),
            image: record.photo.clone().or(player.image),
        };
        repos.players.update_player(player.id, &draft).await?;
        count.inserted += 1;
    }
    Ok(count)
}

async fn import_news(
    repos: &Repositories<'_>,
    json: &str,
    news_ids: &mut HashMap<i64, i64>,
) -> anyhow::Result<PhaseCount> {
    let mut count = PhaseCount::default();

    for record in parse_news(json)? {
        let mut draft = NewsDraft::new(record.title.clone(), record.content.clone());
        draft.image = record.picture.clone();
        draft.original_source = record.original_source.clone();
        if let Err(e) = draft.validate() {
            tracing::warn!(news = record.id, error = %e, "Invalid news record, skipping");
            count.skipped += 1;
            continue;
        }

        if let Some(name) = record.related_player.as_deref() {
            match repos.players.get_player_by_name(name).await? {
                Some(player) => draft.player_ids.push(player.id),
                None => {
                    tracing::warn!(news = record.id, player = %name, "Unknown related player");
                    count.unlinked += 1;
                }
            }
        }
        if let Some(name) = record.related_team.as_deref() {
            match repos.teams.get_team_by_name(name).await? {
                Some(team) => draft.team_ids.push(team.id),
                None => {
                    tracing::warn!(news = record.id, team = %name, "Unknown related team");
                    count.unlinked += 1;
                }
            }
        }

        let news = repos.news.create_news(&draft).await?;
        news_ids.insert(record.id, news.id);
        count.inserted += 1;
    }
    Ok(count)
}

async fn import_users(
    repos: &Repositories<'_>,
    json: &str,
    admin_email: Option<&str>,
    user_ids: &mut HashMap<i64, i64>,
) -> anyhow::Result<PhaseCount> {
    let mut count = PhaseCount::default();
    let roles = repos.roles.list_roles().await?;

    for record in parse_users(json)? {
        let email = normalize_email(&record.email);
        let new_user = NewUser {
            role_id: assign_role(&email, admin_email, &roles).map(|r| r.id),
            avatar_hash: Some(avatar_hash(&email)),
            email,
            username: record.username.trim().to_string(),
            password_hash: hash_password_blocking(record.password.clone()).await?,
            member_since: Utc::now(),
        };

        match repos.users.create_user(&new_user).await {
            Ok(user) => {
                user_ids.insert(record.serial, user.id);
                count.inserted += 1;
            }
            Err(RepositoryError::AlreadyExists { .. }) => {
                tracing::warn!(username = %new_user.username, "User already exists, skipping");
                count.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(count)
}

async fn import_comments(
    repos: &Repositories<'_>,
    json: &str,
    user_ids: &HashMap<i64, i64>,
    news_ids: &HashMap<i64, i64>,
) -> anyhow::Result<PhaseCount> {
    let mut count = PhaseCount::default();

    for record in parse_comments(json)? {
        let (Some(author_id), Some(news_id)) =
            (user_ids.get(&record.user_id), news_ids.get(&record.news_id))
        else {
            tracing::warn!(
                comment = record.serial,
                user = record.user_id,
                news = record.news_id,
                "Comment references unknown user or news, skipping"
            );
            count.skipped += 1;
            continue;
        };
        if validate_comment_body(&record.body).is_err() {
            tracing::warn!(comment = record.serial, "Empty comment, skipping");
            count.skipped += 1;
            continue;
        }

        repos
            .comments
            .create_comment(&NewComment {
                body: record.body.clone(),
                author_id: *author_id,
                news_id: *news_id,
                timestamp: Utc::now(),
            })
            .await?;
        count.inserted += 1;
    }
    Ok(count)
}
