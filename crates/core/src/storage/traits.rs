use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AuthoredComment, Comment, News, NewsDraft, NewComment, NewUser, Permission, Player,
    PlayerDraft, Role, Team, TeamDraft, User, UserUpdate,
};
use crate::pagination::{Paginated, Pagination};

use super::Result;

/// Repository for roles.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every role ordered by id.
    async fn list_roles(&self) -> Result<Vec<Role>>;

    /// Gets a role by its ID.
    async fn get_role(&self, id: i64) -> Result<Option<Role>>;

    /// Gets a role by its unique name.
    async fn get_role_by_name(&self, name: &str) -> Result<Option<Role>>;

    /// Creates the role if missing, otherwise resets its permissions and default flag.
    async fn upsert_role(&self, name: &str, permissions: Permission, default: bool)
        -> Result<Role>;
}

/// Repository for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Gets a user (with their role) by ID.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user by email; lookups are case-insensitive.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Gets a user by username.
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Lists users ordered by id.
    async fn list_users(&self, pagination: Pagination) -> Result<Paginated<User>>;

    /// Creates a user. Fails with `AlreadyExists` when the email or username is taken.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    /// Applies admin edits to a user.
    async fn update_user(&self, id: i64, update: &UserUpdate) -> Result<User>;

    /// Replaces a user's password hash.
    async fn set_password_hash(&self, id: i64, password_hash: &str) -> Result<()>;

    /// Records activity for a user.
    async fn touch_last_seen(&self, id: i64, at: DateTime<Utc>) -> Result<()>;

    /// Deletes a user and their comments.
    async fn delete_user(&self, id: i64) -> Result<()>;
}

/// Repository for teams.
#[async_trait]
pub trait TeamRepository: Send + Sync {
    async fn get_team(&self, id: i64) -> Result<Option<Team>>;

    async fn get_team_by_name(&self, name: &str) -> Result<Option<Team>>;

    /// Lists teams ordered by id.
    async fn list_teams(&self, pagination: Pagination) -> Result<Paginated<Team>>;

    /// Every team ordered by name, for select boxes.
    async fn all_teams(&self) -> Result<Vec<Team>>;

    async fn create_team(&self, draft: &TeamDraft) -> Result<Team>;

    async fn update_team(&self, id: i64, draft: &TeamDraft) -> Result<Team>;

    /// Deletes a team; its players become team-less.
    async fn delete_team(&self, id: i64) -> Result<()>;
}

/// Repository for players.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    async fn get_player(&self, id: i64) -> Result<Option<Player>>;

    async fn get_player_by_name(&self, name: &str) -> Result<Option<Player>>;

    /// Lists players ordered by id.
    async fn list_players(&self, pagination: Pagination) -> Result<Paginated<Player>>;

    /// Every player ordered by name, for select boxes.
    async fn all_players(&self) -> Result<Vec<Player>>;

    /// Roster of a team ordered by id.
    async fn players_for_team(&self, team_id: i64) -> Result<Vec<Player>>;

    async fn create_player(&self, draft: &PlayerDraft) -> Result<Player>;

    async fn update_player(&self, id: i64, draft: &PlayerDraft) -> Result<Player>;

    async fn delete_player(&self, id: i64) -> Result<()>;
}

/// Repository for news articles and their player/team associations.
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn get_news(&self, id: i64) -> Result<Option<News>>;

    /// Lists news, newest first.
    async fn list_news(&self, pagination: Pagination) -> Result<Paginated<News>>;

    /// News related to a player, newest first.
    async fn news_for_player(
        &self,
        player_id: i64,
        pagination: Pagination,
    ) -> Result<Paginated<News>>;

    /// News related to a team, newest first.
    async fn news_for_team(&self, team_id: i64, pagination: Pagination)
        -> Result<Paginated<News>>;

    async fn related_players(&self, news_id: i64) -> Result<Vec<Player>>;

    async fn related_teams(&self, news_id: i64) -> Result<Vec<Team>>;

    /// Creates an article and links the draft's players and teams.
    async fn create_news(&self, draft: &NewsDraft) -> Result<News>;

    /// Updates an article and replaces its associations.
    async fn update_news(&self, id: i64, draft: &NewsDraft) -> Result<News>;

    /// Deletes an article with its comments and associations.
    async fn delete_news(&self, id: i64) -> Result<()>;

    /// Increments the like counter, returning the new count or `None` for an unknown id.
    async fn add_heart(&self, id: i64) -> Result<Option<i64>>;
}

/// Repository for comments.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on an article with their authors, oldest first.
    async fn comments_for_news(&self, news_id: i64) -> Result<Vec<AuthoredComment>>;

    async fn create_comment(&self, comment: &NewComment) -> Result<Comment>;
}

/// Readiness probe for the backing store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<()>;
}
