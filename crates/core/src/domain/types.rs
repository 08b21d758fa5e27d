use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::permission::Permission;

/// A named permission set assigned to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    /// Role given to new users that are not the configured administrator.
    pub default: bool,
    pub permissions: Permission,
}

/// One of the roles every deployment starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardRole {
    pub name: &'static str,
    pub permissions: Permission,
    pub default: bool,
}

impl Role {
    /// The built-in roles created by `deploy`.
    pub fn standard_roles() -> [StandardRole; 3] {
        [
            StandardRole {
                name: "User",
                permissions: Permission::COMMENT | Permission::WRITE_ARTICLES,
                default: true,
            },
            StandardRole {
                name: "Moderator",
                permissions: Permission::COMMENT
                    | Permission::WRITE_ARTICLES
                    | Permission::MODERATE_COMMENTS,
                default: false,
            },
            StandardRole {
                name: "Administrator",
                permissions: Permission::all(),
                default: false,
            },
        ]
    }

    pub fn is_administrator(&self) -> bool {
        self.permissions.contains(Permission::ADMINISTER)
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub role: Option<Role>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub member_since: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    pub avatar_hash: Option<String>,
}

impl User {
    /// Returns true if the user's role grants every bit of `permissions`.
    pub fn can(&self, permissions: Permission) -> bool {
        self.role
            .as_ref()
            .is_some_and(|role| role.permissions.contains(permissions))
    }

    pub fn is_administrator(&self) -> bool {
        self.can(Permission::ADMINISTER)
    }

    pub fn role_id(&self) -> Option<i64> {
        self.role.as_ref().map(|role| role.id)
    }

    pub fn role_name(&self) -> &str {
        self.role.as_ref().map(|role| role.name.as_str()).unwrap_or("-")
    }

    /// Gravatar image URL for this user.
    pub fn gravatar(&self, size: u32, secure: bool) -> String {
        let hash = self
            .avatar_hash
            .clone()
            .unwrap_or_else(|| super::functions::avatar_hash(&self.email));
        super::functions::gravatar_url(&hash, size, secure)
    }
}

/// A club or national side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub introduction: Option<String>,
    pub image: Option<String>,
}

/// A player, optionally on a team's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub team_id: Option<i64>,
    pub introduction: Option<String>,
    pub image: Option<String>,
}

/// A news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub original_source: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Like counter.
    pub hearts: i64,
}

impl News {
    /// First `max_chars` characters of the content, for cards.
    pub fn excerpt(&self, max_chars: usize) -> String {
        let mut chars = self.content.chars();
        let excerpt: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{}…", excerpt.trim_end())
        } else {
            excerpt
        }
    }
}

/// A comment left by a user on a news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub author_id: i64,
    pub news_id: i64,
}

/// A comment joined with the fields needed to display its author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredComment {
    pub comment: Comment,
    pub author_username: String,
    pub author_email: String,
    pub author_avatar_hash: Option<String>,
}

impl AuthoredComment {
    pub fn gravatar(&self, size: u32, secure: bool) -> String {
        let hash = self
            .author_avatar_hash
            .clone()
            .unwrap_or_else(|| super::functions::avatar_hash(&self.author_email));
        super::functions::gravatar_url(&hash, size, secure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(name: &str, permissions: Permission) -> Role {
        Role {
            id: 1,
            name: name.to_string(),
            default: false,
            permissions,
        }
    }

    fn user_with_role(role: Option<Role>) -> User {
        User {
            id: 7,
            email: "fan@example.com".to_string(),
            username: "fan".to_string(),
            role,
            password_hash: String::new(),
            member_since: Utc::now(),
            last_seen: Utc::now(),
            avatar_hash: None,
        }
    }

    #[test]
    fn test_standard_roles() {
        let roles = Role::standard_roles();
        assert_eq!(roles.len(), 3);

        let defaults: Vec<_> = roles.iter().filter(|r| r.default).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].name, "User");

        let admin = roles.iter().find(|r| r.name == "Administrator").unwrap();
        assert_eq!(admin.permissions.bits(), 0xff);
    }

    #[test]
    fn test_user_role_can_comment_but_not_moderate() {
        let user = user_with_role(Some(role(
            "User",
            Permission::COMMENT | Permission::WRITE_ARTICLES,
        )));

        assert!(user.can(Permission::COMMENT));
        assert!(user.can(Permission::WRITE_ARTICLES));
        assert!(!user.can(Permission::MODERATE_COMMENTS));
        assert!(!user.is_administrator());
    }

    #[test]
    fn test_administrator_can_everything() {
        let user = user_with_role(Some(role("Administrator", Permission::all())));

        assert!(user.can(Permission::MODERATE_COMMENTS));
        assert!(user.is_administrator());
    }

    #[test]
    fn test_user_without_role_can_nothing() {
        let user = user_with_role(None);

        assert!(!user.can(Permission::COMMENT));
        assert!(!user.is_administrator());
        assert_eq!(user.role_name(), "-");
    }

    #[test]
    fn test_gravatar_falls_back_to_email_hash() {
        let user = user_with_role(None);
        let url = user.gravatar(40, true);

        assert!(url.starts_with("https://secure.gravatar.com/avatar/"));
        assert!(url.contains(&crate::domain::avatar_hash("fan@example.com")));
        assert!(url.ends_with("?s=40&d=identicon&r=g"));
    }

    #[test]
    fn test_news_excerpt() {
        let news = News {
            id: 1,
            title: "t".to_string(),
            content: "abcdefghij".to_string(),
            image: None,
            original_source: None,
            timestamp: Utc::now(),
            hearts: 0,
        };

        assert_eq!(news.excerpt(20), "abcdefghij");
        assert_eq!(news.excerpt(4), "abcd…");
    }
}
