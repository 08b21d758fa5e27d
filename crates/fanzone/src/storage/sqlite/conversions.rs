//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use fanzone_core::domain::{AuthoredComment, Comment, News, Permission, Player, Role, Team, User};

// ============================================================================
// Role / user conversions
// ============================================================================

/// Convert a SQLite row to a Role.
///
/// Expected columns: id, name, is_default, permissions
pub fn row_to_role(row: &Row) -> rusqlite::Result<Role> {
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        default: row.get(2)?,
        permissions: Permission::from_bits(row.get(3)?),
    })
}

/// Convert a SQLite row to a User with its optional role.
///
/// Expected columns: id, email, username, password_hash, member_since,
/// last_seen, avatar_hash, then role id, name, is_default, permissions
/// (all NULL when the user has no role).
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let member_since: String = row.get(4)?;
    let last_seen: String = row.get(5)?;

    let role = match row.get::<_, Option<i64>>(7)? {
        Some(role_id) => Some(Role {
            id: role_id,
            name: row.get(8)?,
            default: row.get(9)?,
            permissions: Permission::from_bits(row.get(10)?),
        }),
        None => None,
    };

    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        username: row.get(2)?,
        password_hash: row.get(3)?,
        member_since: parse_datetime(&member_since)?,
        last_seen: parse_datetime(&last_seen)?,
        avatar_hash: row.get(6)?,
        role,
    })
}

// ============================================================================
// Team / player conversions
// ============================================================================

/// Expected columns: id, name, introduction, image
pub fn row_to_team(row: &Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        introduction: row.get(2)?,
        image: row.get(3)?,
    })
}

/// Expected columns: id, name, team_id, introduction, image
pub fn row_to_player(row: &Row) -> rusqlite::Result<Player> {
    Ok(Player {
        id: row.get(0)?,
        name: row.get(1)?,
        team_id: row.get(2)?,
        introduction: row.get(3)?,
        image: row.get(4)?,
    })
}

// ============================================================================
// News / comment conversions
// ============================================================================

/// Expected columns: id, title, content, image, original_source, timestamp, hearts
pub fn row_to_news(row: &Row) -> rusqlite::Result<News> {
    let timestamp: String = row.get(5)?;

    Ok(News {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        image: row.get(3)?,
        original_source: row.get(4)?,
        timestamp: parse_datetime(&timestamp)?,
        hearts: row.get(6)?,
    })
}

/// Expected columns: id, body, timestamp, author_id, news_id, username, email, avatar_hash
pub fn row_to_authored_comment(row: &Row) -> rusqlite::Result<AuthoredComment> {
    let timestamp: String = row.get(2)?;

    Ok(AuthoredComment {
        comment: Comment {
            id: row.get(0)?,
            body: row.get(1)?,
            timestamp: parse_datetime(&timestamp)?,
            author_id: row.get(3)?,
            news_id: row.get(4)?,
        },
        author_username: row.get(5)?,
        author_email: row.get(6)?,
        author_avatar_hash: row.get(7)?,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse an RFC 3339 timestamp from SQLite.
pub fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })
}

/// Format a DateTime for SQLite storage.
///
/// Fixed precision and a `Z` suffix keep text ordering equal to time ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
