//! `fanzone fake`: random development data.

use chrono::Utc;
use fanzone_auth::password::hash_password_blocking;
use fanzone_core::domain::{avatar_hash, NewComment, NewUser};
use fanzone_core::seed::fake::{fake_comments, fake_news, fake_players, fake_teams, fake_users};
use fanzone_core::seed::{PhaseCount, SeedSummary};
use fanzone_core::storage::RepositoryError;
use rand::Rng;

use super::import::Repositories;

/// How many records of each kind to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FakeCounts {
    pub users: usize,
    pub teams: usize,
    pub players: usize,
    pub news: usize,
    pub comments: usize,
}

/// Generates and stores random data in dependency order.
///
/// New players, news and comments reference only the rows created in the
/// same run. Users whose email or username is taken are skipped.
pub async fn generate<R: Rng + ?Sized>(
    repos: &Repositories<'_>,
    rng: &mut R,
    counts: FakeCounts,
) -> anyhow::Result<SeedSummary> {
    let now = Utc::now();
    let mut summary = SeedSummary::default();
    let roles = repos.roles.list_roles().await?;
    let default_role = roles.iter().find(|r| r.default).map(|r| r.id);

    let mut user_ids = Vec::new();
    for fake in fake_users(rng, counts.users, now) {
        let new_user = NewUser {
            avatar_hash: Some(avatar_hash(&fake.email)),
            email: fake.email,
            username: fake.username,
            password_hash: hash_password_blocking(fake.password).await?,
            role_id: default_role,
            member_since: fake.member_since,
        };
        match repos.users.create_user(&new_user).await {
            Ok(user) => {
                user_ids.push(user.id);
                summary.users.inserted += 1;
            }
            Err(RepositoryError::AlreadyExists { .. }) => {
                tracing::debug!(username = %new_user.username, "Duplicate fake user");
                summary.users.skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut team_ids = Vec::new();
    for draft in fake_teams(rng, counts.teams) {
        team_ids.push(repos.teams.create_team(&draft).await?.id);
    }
    summary.teams = inserted(team_ids.len());

    let mut player_ids = Vec::new();
    for draft in fake_players(rng, counts.players, &team_ids) {
        player_ids.push(repos.players.create_player(&draft).await?.id);
    }
    summary.players = inserted(player_ids.len());

    let mut news_ids = Vec::new();
    for draft in fake_news(rng, counts.news, &player_ids, &team_ids, now) {
        news_ids.push(repos.news.create_news(&draft).await?.id);
    }
    summary.news = inserted(news_ids.len());

    for fake in fake_comments(rng, counts.comments, &user_ids, &news_ids, now) {
        repos
            .comments
            .create_comment(&NewComment {
                body: fake.body,
                author_id: fake.author_id,
                news_id: fake.news_id,
                timestamp: fake.timestamp,
            })
            .await?;
        summary.comments.inserted += 1;
    }

    tracing::info!(
        users = summary.users.inserted,
        teams = summary.teams.inserted,
        players = summary.players.inserted,
        news = summary.news.inserted,
        comments = summary.comments.inserted,
        "Generated fake data"
    );
    Ok(summary)
}

fn inserted(n: usize) -> PhaseCount {
    PhaseCount::new(n as u64, 0)
}
