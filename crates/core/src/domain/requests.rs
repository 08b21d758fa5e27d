//! Write-side payloads for the domain records.
//!
//! Drafts carry the user-editable fields of a record; repositories assign
//! ids and defaults. Following the Functional Core pattern, validation here
//! is pure and runs before any storage call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

const MAX_NAME_LEN: usize = 64;
const MAX_TITLE_LEN: usize = 256;

/// Turns blank optional text into `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn require(value: &str, field: &'static str, max: usize) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required(field));
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

/// Checks the overall shape of an email address.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require(email, "Email", MAX_NAME_LEN)?;

    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail);
    }

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.') =>
        {
            Ok(())
        }
        _ => Err(ValidationError::InvalidEmail),
    }
}

/// Usernames start with a letter and contain only letters, digits, dots or underscores.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    require(username, "Username", MAX_NAME_LEN)?;

    let mut chars = username.trim().chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_valid = chars.all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '_');

    if starts_with_letter && rest_valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidUsername)
    }
}

/// Validates a comment body.
pub fn validate_comment_body(body: &str) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        Err(ValidationError::EmptyComment)
    } else {
        Ok(())
    }
}

/// Editable fields of a team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub name: String,
    pub introduction: Option<String>,
    pub image: Option<String>,
}

impl TeamDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = Some(introduction.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "Name", MAX_NAME_LEN)
    }
}

/// Editable fields of a player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerDraft {
    pub name: String,
    pub team_id: Option<i64>,
    pub introduction: Option<String>,
    pub image: Option<String>,
}

impl PlayerDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn on_team(mut self, team_id: i64) -> Self {
        self.team_id = Some(team_id);
        self
    }

    pub fn with_introduction(mut self, introduction: impl Into<String>) -> Self {
        self.introduction = Some(introduction.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "Name", MAX_NAME_LEN)
    }
}

/// Editable fields of a news article, including its relations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsDraft {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub original_source: Option<String>,
    /// Publication time; `None` means now on create and unchanged on update.
    pub timestamp: Option<DateTime<Utc>>,
    pub player_ids: Vec<i64>,
    pub team_ids: Vec<i64>,
}

impl NewsDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn with_players(mut self, player_ids: impl IntoIterator<Item = i64>) -> Self {
        self.player_ids = player_ids.into_iter().collect();
        self
    }

    pub fn with_teams(mut self, team_ids: impl IntoIterator<Item = i64>) -> Self {
        self.team_ids = team_ids.into_iter().collect();
        self
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.title, "Title", MAX_TITLE_LEN)?;
        if self.content.trim().is_empty() {
            return Err(ValidationError::Required("Content"));
        }
        Ok(())
    }
}

/// A new account, with the password already hashed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role_id: Option<i64>,
    pub avatar_hash: Option<String>,
    pub member_since: DateTime<Utc>,
}

/// Admin-side changes to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    pub email: String,
    pub username: String,
    pub role_id: Option<i64>,
    /// Replaces the stored hash when present.
    pub password_hash: Option<String>,
    pub avatar_hash: Option<String>,
}

/// A comment about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub body: String,
    pub author_id: i64,
    pub news_id: i64,
    pub timestamp: DateTime<Utc>,
}

/// Sign-up form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
    pub password2: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_email(&self.email)?;
        validate_username(&self.username)?;
        validate_password_pair(&self.password, &self.password2)
    }
}

/// Checks a new password and its confirmation.
pub fn validate_password_pair(password: &str, confirmation: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::Required("Password"));
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
