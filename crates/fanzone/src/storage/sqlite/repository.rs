//! SQLite repository implementation.
//!
//! Implements the repository traits from `fanzone_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection as SyncConnection, OptionalExtension, Params, Row};
use tokio_rusqlite::Connection;

use fanzone_core::domain::{
    AuthoredComment, Comment, News, NewComment, NewUser, NewsDraft, Permission, Player,
    PlayerDraft, Role, Team, TeamDraft, User, UserUpdate,
};
use fanzone_core::pagination::{Paginated, Pagination};
use fanzone_core::storage::{
    CommentRepository, HealthCheck, NewsRepository, PlayerRepository, RepositoryError, Result,
    RoleRepository, TeamRepository, UserRepository,
};

use super::conversions::{
    format_datetime, row_to_authored_comment, row_to_news, row_to_player, row_to_role,
    row_to_team, row_to_user,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Runs a query and collects every mapped row.
fn query_all<T, P, F>(conn: &SyncConnection, sql: &str, params: P, f: F) -> rusqlite::Result<Vec<T>>
where
    P: Params,
    F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, f)?;
    rows.collect()
}

/// Runs a `SELECT COUNT(*)` query.
fn count<P: Params>(conn: &SyncConnection, sql: &str, params: P) -> rusqlite::Result<u64> {
    let total: i64 = conn.query_row(sql, params, |row| row.get(0))?;
    Ok(total.max(0) as u64)
}

fn limit_offset(pagination: Pagination) -> (i64, i64) {
    (
        i64::from(pagination.limit()),
        i64::try_from(pagination.offset()).unwrap_or(i64::MAX),
    )
}

/// Fails with `QueryReturnedNoRows` when an UPDATE/DELETE touched nothing.
fn require_rows(rows: usize) -> std::result::Result<(), tokio_rusqlite::Error> {
    if rows == 0 {
        Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
    } else {
        Ok(())
    }
}

fn select_user(conn: &SyncConnection, condition: &str, value: &dyn rusqlite::ToSql) -> rusqlite::Result<Option<User>> {
    conn.query_row(&schema::select_user_where(condition), [value], row_to_user)
        .optional()
}

fn select_news(conn: &SyncConnection, id: i64) -> rusqlite::Result<Option<News>> {
    conn.query_row(schema::SELECT_NEWS_BY_ID, [id], row_to_news)
        .optional()
}

fn link_news(
    conn: &SyncConnection,
    news_id: i64,
    player_ids: &[i64],
    team_ids: &[i64],
) -> rusqlite::Result<()> {
    for player_id in player_ids {
        conn.execute(schema::INSERT_NEWS_PLAYER, params![news_id, player_id])?;
    }
    for team_id in team_ids {
        conn.execute(schema::INSERT_NEWS_TEAM, params![news_id, team_id])?;
    }
    Ok(())
}

/// SQLite-based repository implementation.
///
/// A single connection serves every repository trait; `tokio-rusqlite`
/// runs its closures on a dedicated thread.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (creating if needed) a file-based database and its schema.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a repository backed by an in-memory database.
    ///
    /// Data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Enables foreign keys and creates the tables. Idempotent.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::PRAGMAS).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// RoleRepository implementation
// ============================================================================

#[async_trait]
impl RoleRepository for SqliteRepository {
    async fn list_roles(&self) -> Result<Vec<Role>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ROLES, params![], row_to_role).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Role"))
    }

    async fn get_role(&self, id: i64) -> Result<Option<Role>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_ROLE_BY_ID, [id], row_to_role)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Role", id))
    }

    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>> {
        let name = name.to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_ROLE_BY_NAME, [&name], row_to_role)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Role"))
    }

    async fn upsert_role(
        &self,
        name: &str,
        permissions: Permission,
        default: bool,
    ) -> Result<Role> {
        let name = name.to_string();
        let role_name = name.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::UPSERT_ROLE,
                    params![name, default, permissions.bits()],
                )
                .map_err(wrap_err)?;
                conn.query_row(schema::SELECT_ROLE_BY_NAME, [&name], row_to_role)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Role", role_name))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| select_user(conn, "u.id = ?1", &id).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = fanzone_core::domain::normalize_email(email);

        self.conn
            .call(move |conn| select_user(conn, "u.email = ?1", &email).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let username = username.trim().to_string();

        self.conn
            .call(move |conn| select_user(conn, "u.username = ?1", &username).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn list_users(&self, pagination: Pagination) -> Result<Paginated<User>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total = count(conn, schema::COUNT_USERS, params![]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    &schema::select_users_page(),
                    params![limit, offset],
                    row_to_user,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let email = fanzone_core::domain::normalize_email(&user.email);
        let username = user.username.trim().to_string();
        let role_id = user.role_id;
        let password_hash = user.password_hash.clone();
        let member_since = format_datetime(&user.member_since);
        let avatar_hash = user.avatar_hash.clone();
        let user_key = email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    params![email, username, role_id, password_hash, member_since, avatar_hash],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                select_user(conn, "u.id = ?1", &id)
                    .and_then(|user| user.ok_or(rusqlite::Error::QueryReturnedNoRows))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_key))
    }

    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User> {
        let email = fanzone_core::domain::normalize_email(&update.email);
        let username = update.username.trim().to_string();
        let role_id = update.role_id;
        let avatar_hash = update.avatar_hash.clone();
        let password_hash = update.password_hash.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = tx
                    .execute(
                        schema::UPDATE_USER,
                        params![id, email, username, role_id, avatar_hash],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)?;
                if let Some(hash) = password_hash {
                    tx.execute(schema::UPDATE_USER_PASSWORD, params![id, hash])
                        .map_err(wrap_err)?;
                }
                let user = select_user(&tx, "u.id = ?1", &id)
                    .and_then(|user| user.ok_or(rusqlite::Error::QueryReturnedNoRows))
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(user)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }

    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<()> {
        let password_hash = password_hash.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::UPDATE_USER_PASSWORD, params![id, password_hash])
                    .map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }

    async fn touch_last_seen(&self, id: i64, at: DateTime<Utc>) -> Result<()> {
        let at = format_datetime(&at);

        self.conn
            .call(move |conn| {
                conn.execute(schema::UPDATE_USER_LAST_SEEN, params![id, at])
                    .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }

    async fn delete_user(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_USER, [id]).map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id))
    }
}

// ============================================================================
// TeamRepository implementation
// ============================================================================

#[async_trait]
impl TeamRepository for SqliteRepository {
    async fn get_team(&self, id: i64) -> Result<Option<Team>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_TEAM_BY_ID, [id], row_to_team)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Team", id))
    }

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>> {
        let name = name.trim().to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_TEAM_BY_NAME, [&name], row_to_team)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Team"))
    }

    async fn list_teams(&self, pagination: Pagination) -> Result<Paginated<Team>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total = count(conn, schema::COUNT_TEAMS, params![]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    schema::SELECT_TEAMS_PAGE,
                    params![limit, offset],
                    row_to_team,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Team"))
    }

    async fn all_teams(&self) -> Result<Vec<Team>> {
        self.conn
            .call(|conn| query_all(conn, schema::SELECT_ALL_TEAMS, params![], row_to_team).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Team"))
    }

    async fn create_team(&self, draft: &TeamDraft) -> Result<Team> {
        let draft = draft.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TEAM,
                    params![draft.name.trim(), draft.introduction, draft.image],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                conn.query_row(schema::SELECT_TEAM_BY_ID, [id], row_to_team)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Team"))
    }

    async fn update_team(&self, id: i64, draft: &TeamDraft) -> Result<Team> {
        let draft = draft.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TEAM,
                        params![id, draft.name.trim(), draft.introduction, draft.image],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)?;
                conn.query_row(schema::SELECT_TEAM_BY_ID, [id], row_to_team)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Team", id))
    }

    async fn delete_team(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_TEAM, [id]).map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Team", id))
    }
}

// ============================================================================
// PlayerRepository implementation
// ============================================================================

#[async_trait]
impl PlayerRepository for SqliteRepository {
    async fn get_player(&self, id: i64) -> Result<Option<Player>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_PLAYER_BY_ID, [id], row_to_player)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Player", id))
    }

    async fn get_player_by_name(&self, name: &str) -> Result<Option<Player>> {
        let name = name.trim().to_string();

        self.conn
            .call(move |conn| {
                conn.query_row(schema::SELECT_PLAYER_BY_NAME, [&name], row_to_player)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn list_players(&self, pagination: Pagination) -> Result<Paginated<Player>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total = count(conn, schema::COUNT_PLAYERS, params![]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    schema::SELECT_PLAYERS_PAGE,
                    params![limit, offset],
                    row_to_player,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn all_players(&self) -> Result<Vec<Player>> {
        self.conn
            .call(|conn| {
                query_all(conn, schema::SELECT_ALL_PLAYERS, params![], row_to_player).map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn players_for_team(&self, team_id: i64) -> Result<Vec<Player>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_PLAYERS_BY_TEAM, [team_id], row_to_player)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Team", team_id))
    }

    async fn create_player(&self, draft: &PlayerDraft) -> Result<Player> {
        let draft = draft.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_PLAYER,
                    params![
                        draft.name.trim(),
                        draft.team_id,
                        draft.introduction,
                        draft.image
                    ],
                )
                .map_err(wrap_err)?;
                let id = conn.last_insert_rowid();
                conn.query_row(schema::SELECT_PLAYER_BY_ID, [id], row_to_player)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Player"))
    }

    async fn update_player(&self, id: i64, draft: &PlayerDraft) -> Result<Player> {
        let draft = draft.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_PLAYER,
                        params![
                            id,
                            draft.name.trim(),
                            draft.team_id,
                            draft.introduction,
                            draft.image
                        ],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)?;
                conn.query_row(schema::SELECT_PLAYER_BY_ID, [id], row_to_player)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Player", id))
    }

    async fn delete_player(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_PLAYER, [id]).map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Player", id))
    }
}

// ============================================================================
// NewsRepository implementation
// ============================================================================

#[async_trait]
impl NewsRepository for SqliteRepository {
    async fn get_news(&self, id: i64) -> Result<Option<News>> {
        self.conn
            .call(move |conn| select_news(conn, id).map_err(wrap_err))
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }

    async fn list_news(&self, pagination: Pagination) -> Result<Paginated<News>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total = count(conn, schema::COUNT_NEWS, params![]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    schema::SELECT_NEWS_PAGE,
                    params![limit, offset],
                    row_to_news,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "News"))
    }

    async fn news_for_player(
        &self,
        player_id: i64,
        pagination: Pagination,
    ) -> Result<Paginated<News>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total =
                    count(conn, schema::COUNT_NEWS_BY_PLAYER, [player_id]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    schema::SELECT_NEWS_BY_PLAYER_PAGE,
                    params![player_id, limit, offset],
                    row_to_news,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Player", player_id))
    }

    async fn news_for_team(
        &self,
        team_id: i64,
        pagination: Pagination,
    ) -> Result<Paginated<News>> {
        let (limit, offset) = limit_offset(pagination);

        self.conn
            .call(move |conn| {
                let total = count(conn, schema::COUNT_NEWS_BY_TEAM, [team_id]).map_err(wrap_err)?;
                let items = query_all(
                    conn,
                    schema::SELECT_NEWS_BY_TEAM_PAGE,
                    params![team_id, limit, offset],
                    row_to_news,
                )
                .map_err(wrap_err)?;
                Ok(Paginated::new(items, total, pagination))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Team", team_id))
    }

    async fn related_players(&self, news_id: i64) -> Result<Vec<Player>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_RELATED_PLAYERS, [news_id], row_to_player)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", news_id))
    }

    async fn related_teams(&self, news_id: i64) -> Result<Vec<Team>> {
        self.conn
            .call(move |conn| {
                query_all(conn, schema::SELECT_RELATED_TEAMS, [news_id], row_to_team)
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", news_id))
    }

    async fn create_news(&self, draft: &NewsDraft) -> Result<News> {
        let draft = draft.clone();
        let timestamp = format_datetime(&draft.timestamp.unwrap_or_else(Utc::now));

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_NEWS,
                    params![
                        draft.title.trim(),
                        draft.content,
                        draft.image,
                        draft.original_source,
                        timestamp
                    ],
                )
                .map_err(wrap_err)?;
                let id = tx.last_insert_rowid();
                link_news(&tx, id, &draft.player_ids, &draft.team_ids).map_err(wrap_err)?;
                let news = select_news(&tx, id)
                    .and_then(|news| news.ok_or(rusqlite::Error::QueryReturnedNoRows))
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(news)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "News"))
    }

    async fn update_news(&self, id: i64, draft: &NewsDraft) -> Result<News> {
        let draft = draft.clone();
        let timestamp = draft.timestamp.as_ref().map(format_datetime);

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let rows = tx
                    .execute(
                        schema::UPDATE_NEWS,
                        params![
                            id,
                            draft.title.trim(),
                            draft.content,
                            draft.image,
                            draft.original_source,
                            timestamp
                        ],
                    )
                    .map_err(wrap_err)?;
                require_rows(rows)?;
                tx.execute(schema::DELETE_NEWS_PLAYERS, [id])
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_NEWS_TEAMS, [id])
                    .map_err(wrap_err)?;
                link_news(&tx, id, &draft.player_ids, &draft.team_ids).map_err(wrap_err)?;
                let news = select_news(&tx, id)
                    .and_then(|news| news.ok_or(rusqlite::Error::QueryReturnedNoRows))
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(news)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }

    async fn delete_news(&self, id: i64) -> Result<()> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_NEWS, [id]).map_err(wrap_err)?;
                require_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }

    async fn add_heart(&self, id: i64) -> Result<Option<i64>> {
        self.conn
            .call(move |conn| {
                conn.query_row(schema::ADD_HEART, [id], |row| row.get(0))
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", id))
    }
}

// ============================================================================
// CommentRepository implementation
// ============================================================================

#[async_trait]
impl CommentRepository for SqliteRepository {
    async fn comments_for_news(&self, news_id: i64) -> Result<Vec<AuthoredComment>> {
        self.conn
            .call(move |conn| {
                query_all(
                    conn,
                    schema::SELECT_COMMENTS_BY_NEWS,
                    [news_id],
                    row_to_authored_comment,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "News", news_id))
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment> {
        let body = comment.body.trim().to_string();
        let timestamp = comment.timestamp;
        let stored_timestamp = format_datetime(&timestamp);
        let author_id = comment.author_id;
        let news_id = comment.news_id;

        let id = self
            .conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_COMMENT,
                    params![body, stored_timestamp, author_id, news_id],
                )
                .map_err(wrap_err)?;
                Ok(conn.last_insert_rowid())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Comment"))?;

        Ok(Comment {
            id,
            body: comment.body.trim().to_string(),
            timestamp,
            author_id,
            news_id,
        })
    }
}

// ============================================================================
// HealthCheck implementation
// ============================================================================

#[async_trait]
impl HealthCheck for SqliteRepository {
    async fn ping(&self) -> Result<()> {
        self.conn
            .call(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    async fn repo() -> SqliteRepository {
        SqliteRepository::new_in_memory().await.unwrap()
    }

    fn new_user(email: &str, username: &str, role_id: Option<i64>) -> NewUser {
        NewUser {
            email: email.to_string(),
            username: username.to_string(),
            password_hash: "hash".to_string(),
            role_id,
            avatar_hash: None,
            member_since: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn page(n: i64, per_page: u32) -> Pagination {
        Pagination::new(n, per_page).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_role_is_idempotent() {
        let repo = repo().await;

        let first = repo
            .upsert_role("User", Permission::COMMENT, false)
            .await
            .unwrap();
        let second = repo
            .upsert_role("User", Permission::COMMENT | Permission::WRITE_ARTICLES, true)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.default);
        assert!(second.permissions.contains(Permission::WRITE_ARTICLES));
        assert_eq!(repo.list_roles().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_user_loads_role() {
        let repo = repo().await;
        let role = repo
            .upsert_role("Administrator", Permission::all(), false)
            .await
            .unwrap();

        let user = repo
            .create_user(&new_user("Admin@Example.com", "admin", Some(role.id)))
            .await
            .unwrap();

        assert_eq!(user.email, "admin@example.com");
        assert!(user.is_administrator());
        assert_eq!(user.member_since, user.last_seen);
    }

    #[tokio::test]
    async fn test_get_user_by_email_is_case_insensitive() {
        let repo = repo().await;
        repo.create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();

        let found = repo.get_user_by_email(" FAN@example.COM ").await.unwrap();

        assert_eq!(found.unwrap().username, "fan");
        assert!(repo
            .get_user_by_email("other@example.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_or_username_is_already_exists() {
        let repo = repo().await;
        repo.create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();

        let same_email = repo
            .create_user(&new_user("FAN@example.com", "other", None))
            .await;
        let same_username = repo
            .create_user(&new_user("other@example.com", "fan", None))
            .await;

        assert!(matches!(
            same_email,
            Err(RepositoryError::AlreadyExists { entity_type: "User", .. })
        ));
        assert!(matches!(
            same_username,
            Err(RepositoryError::AlreadyExists { entity_type: "User", .. })
        ));
    }

    #[tokio::test]
    async fn test_update_user_replaces_password_only_when_given() {
        let repo = repo().await;
        let user = repo
            .create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();

        let mut update = UserUpdate {
            email: "new@example.com".to_string(),
            username: "renamed".to_string(),
            role_id: None,
            password_hash: None,
            avatar_hash: Some("abc".to_string()),
        };
        let updated = repo.update_user(user.id, &update).await.unwrap();
        assert_eq!(updated.username, "renamed");
        assert_eq!(updated.password_hash, "hash");

        update.password_hash = Some("new-hash".to_string());
        let updated = repo.update_user(user.id, &update).await.unwrap();
        assert_eq!(updated.password_hash, "new-hash");
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = repo().await;
        let update = UserUpdate {
            email: "x@example.com".to_string(),
            username: "x".to_string(),
            role_id: None,
            password_hash: None,
            avatar_hash: None,
        };

        let result = repo.update_user(99, &update).await;

        assert_eq!(result, Err(RepositoryError::not_found("User", 99)));
    }

    #[tokio::test]
    async fn test_touch_last_seen() {
        let repo = repo().await;
        let user = repo
            .create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();
        let later = user.last_seen + Duration::hours(3);

        repo.touch_last_seen(user.id, later).await.unwrap();

        let reloaded = repo.get_user(user.id).await.unwrap().unwrap();
        assert_eq!(reloaded.last_seen, later);
    }

    #[tokio::test]
    async fn test_list_users_paginates_by_id() {
        let repo = repo().await;
        for i in 0..5 {
            repo.create_user(&new_user(&format!("u{i}@example.com"), &format!("u{i}"), None))
                .await
                .unwrap();
        }

        let second = repo.list_users(page(2, 2)).await.unwrap();

        assert_eq!(second.total, 5);
        assert_eq!(second.pages(), 3);
        let names: Vec<_> = second.items.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["u2", "u3"]);
    }

    #[tokio::test]
    async fn test_delete_team_keeps_players_without_team() {
        let repo = repo().await;
        let team = repo.create_team(&TeamDraft::new("Lakers")).await.unwrap();
        let player = repo
            .create_player(&PlayerDraft::new("LeBron James").on_team(team.id))
            .await
            .unwrap();

        repo.delete_team(team.id).await.unwrap();

        let player = repo.get_player(player.id).await.unwrap().unwrap();
        assert_eq!(player.team_id, None);
        assert!(repo.get_team(team.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_players_for_team_and_name_lookup() {
        let repo = repo().await;
        let team = repo.create_team(&TeamDraft::new("Bulls")).await.unwrap();
        repo.create_player(&PlayerDraft::new("Michael Jordan").on_team(team.id))
            .await
            .unwrap();
        repo.create_player(&PlayerDraft::new("Scottie Pippen").on_team(team.id))
            .await
            .unwrap();
        repo.create_player(&PlayerDraft::new("Free Agent"))
            .await
            .unwrap();

        assert_eq!(repo.players_for_team(team.id).await.unwrap().len(), 2);
        assert_eq!(
            repo.get_team_by_name("Bulls").await.unwrap().map(|t| t.id),
            Some(team.id)
        );
        assert!(repo
            .get_player_by_name("Scottie Pippen")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_player_with_unknown_team_is_invalid_data() {
        let repo = repo().await;

        let result = repo
            .create_player(&PlayerDraft::new("Nobody").on_team(404))
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_list_news_newest_first() {
        let repo = repo().await;
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        for day in 0..3 {
            repo.create_news(&NewsDraft::new(format!("Day {day}"), "Body").at(base + Duration::days(day)))
                .await
                .unwrap();
        }

        let news = repo.list_news(page(1, 12)).await.unwrap();

        let titles: Vec<_> = news.items.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Day 2", "Day 1", "Day 0"]);
        assert_eq!(news.items[0].hearts, 0);
    }

    #[tokio::test]
    async fn test_news_associations_ignore_duplicates() {
        let repo = repo().await;
        let team = repo.create_team(&TeamDraft::new("Celtics")).await.unwrap();
        let player = repo
            .create_player(&PlayerDraft::new("Larry Bird").on_team(team.id))
            .await
            .unwrap();

        let news = repo
            .create_news(
                &NewsDraft::new("Bird scores 60", "Body")
                    .with_players([player.id, player.id])
                    .with_teams([team.id]),
            )
            .await
            .unwrap();

        assert_eq!(repo.related_players(news.id).await.unwrap(), vec![player.clone()]);
        assert_eq!(repo.related_teams(news.id).await.unwrap(), vec![team.clone()]);
        assert_eq!(
            repo.news_for_player(player.id, page(1, 12)).await.unwrap().total,
            1
        );
        assert_eq!(
            repo.news_for_team(team.id, page(1, 12)).await.unwrap().items[0].id,
            news.id
        );
    }

    #[tokio::test]
    async fn test_update_news_replaces_associations_and_keeps_timestamp() {
        let repo = repo().await;
        let a = repo.create_team(&TeamDraft::new("A")).await.unwrap();
        let b = repo.create_team(&TeamDraft::new("B")).await.unwrap();
        let published = Utc.with_ymd_and_hms(2022, 2, 2, 0, 0, 0).unwrap();
        let news = repo
            .create_news(&NewsDraft::new("T", "C").with_teams([a.id]).at(published))
            .await
            .unwrap();

        let updated = repo
            .update_news(news.id, &NewsDraft::new("T2", "C2").with_teams([b.id]))
            .await
            .unwrap();

        assert_eq!(updated.title, "T2");
        assert_eq!(updated.timestamp, published);
        assert_eq!(repo.related_teams(news.id).await.unwrap(), vec![b]);
    }

    #[tokio::test]
    async fn test_add_heart_increments() {
        let repo = repo().await;
        let news = repo.create_news(&NewsDraft::new("T", "C")).await.unwrap();

        assert_eq!(repo.add_heart(news.id).await.unwrap(), Some(1));
        assert_eq!(repo.add_heart(news.id).await.unwrap(), Some(2));
        assert_eq!(repo.add_heart(12345).await.unwrap(), None);
        assert_eq!(repo.get_news(news.id).await.unwrap().unwrap().hearts, 2);
    }

    #[tokio::test]
    async fn test_comments_oldest_first_and_cascade() {
        let repo = repo().await;
        let user = repo
            .create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();
        let news = repo.create_news(&NewsDraft::new("T", "C")).await.unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        for (offset, body) in [(2, "second"), (1, "first")] {
            repo.create_comment(&NewComment {
                body: body.to_string(),
                author_id: user.id,
                news_id: news.id,
                timestamp: base + Duration::minutes(offset),
            })
            .await
            .unwrap();
        }

        let comments = repo.comments_for_news(news.id).await.unwrap();
        let bodies: Vec<_> = comments.iter().map(|c| c.comment.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second"]);
        assert_eq!(comments[0].author_username, "fan");

        repo.delete_user(user.id).await.unwrap();
        assert!(repo.comments_for_news(news.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comment_on_missing_news_is_invalid_data() {
        let repo = repo().await;
        let user = repo
            .create_user(&new_user("fan@example.com", "fan", None))
            .await
            .unwrap();

        let result = repo
            .create_comment(&NewComment {
                body: "hello".to_string(),
                author_id: user.id,
                news_id: 77,
                timestamp: Utc::now(),
            })
            .await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_delete_missing_rows_is_not_found() {
        let repo = repo().await;

        assert_eq!(
            repo.delete_news(5).await,
            Err(RepositoryError::not_found("News", 5))
        );
        assert_eq!(
            repo.delete_player(6).await,
            Err(RepositoryError::not_found("Player", 6))
        );
    }

    #[tokio::test]
    async fn test_ping() {
        assert!(repo().await.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fanzone.db");
        let path = path.to_str().unwrap();

        {
            let repo = SqliteRepository::new(path).await.unwrap();
            repo.create_team(&TeamDraft::new("Spurs")).await.unwrap();
        }

        let repo = SqliteRepository::new(path).await.unwrap();
        assert!(repo.get_team_by_name("Spurs").await.unwrap().is_some());
    }
}
