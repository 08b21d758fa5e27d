//! Fixture records as they appear in the seed JSON files.
//!
//! Field names follow the files verbatim; numeric ids may be written either
//! as JSON numbers or as strings.

use serde::{Deserialize, Deserializer};

use super::SeedError;

pub const TEAMS_FILE: &str = "teams.json";
pub const PLAYERS_FILE: &str = "players.json";
pub const NEWS_FILE: &str = "news.json";
pub const USERS_FILE: &str = "users.json";
pub const COMMENTS_FILE: &str = "comments.json";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TeamRecord {
    #[serde(rename = "TeamName")]
    pub name: String,
    #[serde(rename = "introduction", default)]
    pub introduction: Option<String>,
    #[serde(rename = "TeamLogo", default)]
    pub logo: Option<String>,
    #[serde(rename = "TeamMember1", default)]
    pub member1: Option<String>,
    #[serde(rename = "TeamMember2", default)]
    pub member2: Option<String>,
    #[serde(rename = "TeamMember3", default)]
    pub member3: Option<String>,
    #[serde(rename = "TeamMember4", default)]
    pub member4: Option<String>,
    #[serde(rename = "TeamMember5", default)]
    pub member5: Option<String>,
}

impl TeamRecord {
    /// Names of the listed members, skipping blank slots.
    pub fn members(&self) -> Vec<&str> {
        [
            &self.member1,
            &self.member2,
            &self.member3,
            &self.member4,
            &self.member5,
        ]
        .into_iter()
        .filter_map(|m| m.as_deref().map(str::trim))
        .filter(|m| !m.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PlayerRecord {
    /// The player's name; fixtures identify players by name.
    #[serde(rename = "PlayerID")]
    pub name: String,
    #[serde(rename = "Introduction", default)]
    pub introduction: Option<String>,
    #[serde(rename = "photo", default)]
    pub photo: Option<String>,
    #[serde(rename = "Teamname", default)]
    pub team_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsRecord {
    #[serde(rename = "NewsID", deserialize_with = "flexible_id")]
    pub id: i64,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Content")]
    pub content: String,
    #[serde(rename = "RelatedPlayer", default)]
    pub related_player: Option<String>,
    #[serde(rename = "RelatedTeam", default)]
    pub related_team: Option<String>,
    #[serde(rename = "OriginalSource", default)]
    pub original_source: Option<String>,
    #[serde(rename = "picture", default)]
    pub picture: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "SerialNumber", deserialize_with = "flexible_id")]
    pub serial: i64,
    #[serde(rename = "Username")]
    pub username: String,
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "E-mail")]
    pub email: String,
    #[serde(rename = "FavouritePlayer", default)]
    pub favourite_player: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommentRecord {
    #[serde(rename = "SerialNumber", deserialize_with = "flexible_id")]
    pub serial: i64,
    #[serde(rename = "UserID", deserialize_with = "flexible_id")]
    pub user_id: i64,
    #[serde(rename = "NewsID", deserialize_with = "flexible_id")]
    pub news_id: i64,
    #[serde(rename = "Comment")]
    pub body: String,
}

fn flexible_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid id: {s:?}"))),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(file: &'static str, json: &str) -> Result<Vec<T>, SeedError> {
    serde_json::from_str(json).map_err(|source| SeedError::Parse { file, source })
}

pub fn parse_teams(json: &str) -> Result<Vec<TeamRecord>, SeedError> {
    parse(TEAMS_FILE, json)
}

pub fn parse_players(json: &str) -> Result<Vec<PlayerRecord>, SeedError> {
    parse(PLAYERS_FILE, json)
}

pub fn parse_news(json: &str) -> Result<Vec<NewsRecord>, SeedError> {
    parse(NEWS_FILE, json)
}

pub fn parse_users(json: &str) -> Result<Vec<UserRecord>, SeedError> {
    parse(USERS_FILE, json)
}

pub fn parse_comments(json: &str) -> Result<Vec<CommentRecord>, SeedError> {
    parse(COMMENTS_FILE, json)
}
