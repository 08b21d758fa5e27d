//! SQLite schema definitions and SQL query constants.
//!
//! Pure data, no I/O. Every connection runs `PRAGMA foreign_keys = ON`
//! before using these statements.

/// Per-connection settings.
pub const PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
-- Roles table
CREATE TABLE IF NOT EXISTS roles (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    is_default INTEGER NOT NULL DEFAULT 0,
    permissions INTEGER NOT NULL DEFAULT 0
);

-- Users table (emails are stored normalized)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    email TEXT NOT NULL UNIQUE COLLATE NOCASE,
    username TEXT NOT NULL UNIQUE,
    role_id INTEGER,
    password_hash TEXT NOT NULL,
    member_since TEXT NOT NULL,
    last_seen TEXT NOT NULL,
    avatar_hash TEXT,
    FOREIGN KEY (role_id) REFERENCES roles(id) ON DELETE SET NULL
);

-- Teams table
CREATE TABLE IF NOT EXISTS teams (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    introduction TEXT,
    image TEXT
);

-- Players table
CREATE TABLE IF NOT EXISTS players (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    team_id INTEGER,
    introduction TEXT,
    image TEXT,
    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE SET NULL
);

-- News table
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    image TEXT,
    original_source TEXT,
    timestamp TEXT NOT NULL,
    hearts INTEGER NOT NULL DEFAULT 0
);

-- News <-> players association
CREATE TABLE IF NOT EXISTS news_players (
    news_id INTEGER NOT NULL,
    player_id INTEGER NOT NULL,
    PRIMARY KEY (news_id, player_id),
    FOREIGN KEY (news_id) REFERENCES news(id) ON DELETE CASCADE,
    FOREIGN KEY (player_id) REFERENCES players(id) ON DELETE CASCADE
);

-- News <-> teams association
CREATE TABLE IF NOT EXISTS news_teams (
    news_id INTEGER NOT NULL,
    team_id INTEGER NOT NULL,
    PRIMARY KEY (news_id, team_id),
    FOREIGN KEY (news_id) REFERENCES news(id) ON DELETE CASCADE,
    FOREIGN KEY (team_id) REFERENCES teams(id) ON DELETE CASCADE
);

-- Comments table
CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY,
    body TEXT NOT NULL,
    timestamp TEXT NOT NULL,
    author_id INTEGER NOT NULL,
    news_id INTEGER NOT NULL,
    FOREIGN KEY (author_id) REFERENCES users(id) ON DELETE CASCADE,
    FOREIGN KEY (news_id) REFERENCES news(id) ON DELETE CASCADE
);

-- Indexes for efficient queries
CREATE INDEX IF NOT EXISTS idx_teams_name ON teams(name);
CREATE INDEX IF NOT EXISTS idx_players_name ON players(name);
CREATE INDEX IF NOT EXISTS idx_players_team_id ON players(team_id);
CREATE INDEX IF NOT EXISTS idx_news_timestamp ON news(timestamp);
CREATE INDEX IF NOT EXISTS idx_news_players_player_id ON news_players(player_id);
CREATE INDEX IF NOT EXISTS idx_news_teams_team_id ON news_teams(team_id);
CREATE INDEX IF NOT EXISTS idx_comments_timestamp ON comments(timestamp);
CREATE INDEX IF NOT EXISTS idx_comments_news_id ON comments(news_id);
"#;

// ============================================================================
// Role queries
// ============================================================================

pub const SELECT_ROLES: &str =
    "SELECT id, name, is_default, permissions FROM roles ORDER BY id";

pub const SELECT_ROLE_BY_ID: &str =
    "SELECT id, name, is_default, permissions FROM roles WHERE id = ?1";

pub const SELECT_ROLE_BY_NAME: &str =
    "SELECT id, name, is_default, permissions FROM roles WHERE name = ?1";

pub const UPSERT_ROLE: &str = r#"
INSERT INTO roles (name, is_default, permissions)
VALUES (?1, ?2, ?3)
ON CONFLICT(name) DO UPDATE SET
    is_default = excluded.is_default,
    permissions = excluded.permissions
"#;

// ============================================================================
// User queries
// ============================================================================

/// User columns followed by the (nullable) role columns.
const USER_COLUMNS: &str = r#"
SELECT u.id, u.email, u.username, u.password_hash, u.member_since, u.last_seen, u.avatar_hash,
       r.id, r.name, r.is_default, r.permissions
FROM users u
LEFT JOIN roles r ON r.id = u.role_id
"#;

pub fn select_user_where(condition: &str) -> String {
    format!("{USER_COLUMNS} WHERE {condition}")
}

pub fn select_users_page() -> String {
    format!("{USER_COLUMNS} ORDER BY u.id LIMIT ?1 OFFSET ?2")
}

pub const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

pub const INSERT_USER: &str = r#"
INSERT INTO users (email, username, role_id, password_hash, member_since, last_seen, avatar_hash)
VALUES (?1, ?2, ?3, ?4, ?5, ?5, ?6)
"#;

pub const UPDATE_USER: &str = r#"
UPDATE users
SET email = ?2, username = ?3, role_id = ?4, avatar_hash = ?5
WHERE id = ?1
"#;

pub const UPDATE_USER_PASSWORD: &str = "UPDATE users SET password_hash = ?2 WHERE id = ?1";

pub const UPDATE_USER_LAST_SEEN: &str = "UPDATE users SET last_seen = ?2 WHERE id = ?1";

pub const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";

// ============================================================================
// Team queries
// ============================================================================

pub const SELECT_TEAM_BY_ID: &str =
    "SELECT id, name, introduction, image FROM teams WHERE id = ?1";

pub const SELECT_TEAM_BY_NAME: &str =
    "SELECT id, name, introduction, image FROM teams WHERE name = ?1 ORDER BY id LIMIT 1";

pub const SELECT_TEAMS_PAGE: &str =
    "SELECT id, name, introduction, image FROM teams ORDER BY id LIMIT ?1 OFFSET ?2";

pub const SELECT_ALL_TEAMS: &str =
    "SELECT id, name, introduction, image FROM teams ORDER BY name, id";

pub const COUNT_TEAMS: &str = "SELECT COUNT(*) FROM teams";

pub const INSERT_TEAM: &str = "INSERT INTO teams (name, introduction, image) VALUES (?1, ?2, ?3)";

pub const UPDATE_TEAM: &str =
    "UPDATE teams SET name = ?2, introduction = ?3, image = ?4 WHERE id = ?1";

pub const DELETE_TEAM: &str = "DELETE FROM teams WHERE id = ?1";

// ============================================================================
// Player queries
// ============================================================================

pub const SELECT_PLAYER_BY_ID: &str =
    "SELECT id, name, team_id, introduction, image FROM players WHERE id = ?1";

pub const SELECT_PLAYER_BY_NAME: &str =
    "SELECT id, name, team_id, introduction, image FROM players WHERE name = ?1 ORDER BY id LIMIT 1";

pub const SELECT_PLAYERS_PAGE: &str =
    "SELECT id, name, team_id, introduction, image FROM players ORDER BY id LIMIT ?1 OFFSET ?2";

pub const SELECT_ALL_PLAYERS: &str =
    "SELECT id, name, team_id, introduction, image FROM players ORDER BY name, id";

pub const SELECT_PLAYERS_BY_TEAM: &str =
    "SELECT id, name, team_id, introduction, image FROM players WHERE team_id = ?1 ORDER BY id";

pub const COUNT_PLAYERS: &str = "SELECT COUNT(*) FROM players";

pub const INSERT_PLAYER: &str =
    "INSERT INTO players (name, team_id, introduction, image) VALUES (?1, ?2, ?3, ?4)";

pub const UPDATE_PLAYER: &str =
    "UPDATE players SET name = ?2, team_id = ?3, introduction = ?4, image = ?5 WHERE id = ?1";

pub const DELETE_PLAYER: &str = "DELETE FROM players WHERE id = ?1";

// ============================================================================
// News queries
// ============================================================================

pub const SELECT_NEWS_BY_ID: &str = r#"
SELECT id, title, content, image, original_source, timestamp, hearts
FROM news WHERE id = ?1
"#;

pub const SELECT_NEWS_PAGE: &str = r#"
SELECT id, title, content, image, original_source, timestamp, hearts
FROM news
ORDER BY timestamp DESC, id DESC
LIMIT ?1 OFFSET ?2
"#;

pub const COUNT_NEWS: &str = "SELECT COUNT(*) FROM news";

pub const SELECT_NEWS_BY_PLAYER_PAGE: &str = r#"
SELECT n.id, n.title, n.content, n.image, n.original_source, n.timestamp, n.hearts
FROM news n
JOIN news_players np ON np.news_id = n.id
WHERE np.player_id = ?1
ORDER BY n.timestamp DESC, n.id DESC
LIMIT ?2 OFFSET ?3
"#;

pub const COUNT_NEWS_BY_PLAYER: &str = "SELECT COUNT(*) FROM news_players WHERE player_id = ?1";

pub const SELECT_NEWS_BY_TEAM_PAGE: &str = r#"
SELECT n.id, n.title, n.content, n.image, n.original_source, n.timestamp, n.hearts
FROM news n
JOIN news_teams nt ON nt.news_id = n.id
WHERE nt.team_id = ?1
ORDER BY n.timestamp DESC, n.id DESC
LIMIT ?2 OFFSET ?3
"#;

pub const COUNT_NEWS_BY_TEAM: &str = "SELECT COUNT(*) FROM news_teams WHERE team_id = ?1";

pub const SELECT_RELATED_PLAYERS: &str = r#"
SELECT p.id, p.name, p.team_id, p.introduction, p.image
FROM players p
JOIN news_players np ON np.player_id = p.id
WHERE np.news_id = ?1
ORDER BY p.id
"#;

pub const SELECT_RELATED_TEAMS: &str = r#"
SELECT t.id, t.name, t.introduction, t.image
FROM teams t
JOIN news_teams nt ON nt.team_id = t.id
WHERE nt.news_id = ?1
ORDER BY t.id
"#;

pub const INSERT_NEWS: &str = r#"
INSERT INTO news (title, content, image, original_source, timestamp)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub const UPDATE_NEWS: &str = r#"
UPDATE news
SET title = ?2, content = ?3, image = ?4, original_source = ?5, timestamp = COALESCE(?6, timestamp)
WHERE id = ?1
"#;

pub const DELETE_NEWS: &str = "DELETE FROM news WHERE id = ?1";

pub const INSERT_NEWS_PLAYER: &str =
    "INSERT OR IGNORE INTO news_players (news_id, player_id) VALUES (?1, ?2)";

pub const INSERT_NEWS_TEAM: &str =
    "INSERT OR IGNORE INTO news_teams (news_id, team_id) VALUES (?1, ?2)";

pub const DELETE_NEWS_PLAYERS: &str = "DELETE FROM news_players WHERE news_id = ?1";

pub const DELETE_NEWS_TEAMS: &str = "DELETE FROM news_teams WHERE news_id = ?1";

pub const ADD_HEART: &str = "UPDATE news SET hearts = hearts + 1 WHERE id = ?1 RETURNING hearts";

// ============================================================================
// Comment queries
// ============================================================================

pub const SELECT_COMMENTS_BY_NEWS: &str = r#"
SELECT c.id, c.body, c.timestamp, c.author_id, c.news_id, u.username, u.email, u.avatar_hash
FROM comments c
JOIN users u ON u.id = c.author_id
WHERE c.news_id = ?1
ORDER BY c.timestamp ASC, c.id ASC
"#;

pub const INSERT_COMMENT: &str =
    "INSERT INTO comments (body, timestamp, author_id, news_id) VALUES (?1, ?2, ?3, ?4)";
